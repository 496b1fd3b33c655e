//! Extraction of account identifiers from a profile page.
//!
//! The portal does not expose these ids through an API. The profile page
//! embeds them in inline script assignments such as
//! `var USERS_ACCOUNT_ID = '1234567';`, which is an unstable contract, so the
//! extraction sits behind [`AccountDataExtractor`] and can be replaced.

use crate::models::AccountData;

pub const ACCOUNT_ID_VAR: &str = "USERS_ACCOUNT_ID";
pub const SAVE_DATA_ID_VAR: &str = "USERS_SAVEDATA_ID";

/// Pulls the account and save-data ids out of a profile page body.
pub trait AccountDataExtractor: Send + Sync {
    /// Returns `None` unless both ids are found and non-empty.
    fn extract(&self, html: &str) -> Option<AccountData>;
}

/// Matches `var <NAME> = '<value>'` assignments in inline scripts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptVarExtractor;

impl AccountDataExtractor for ScriptVarExtractor {
    fn extract(&self, html: &str) -> Option<AccountData> {
        let account_id = script_var(html, ACCOUNT_ID_VAR).filter(|v| !v.is_empty())?;
        let save_data_id = script_var(html, SAVE_DATA_ID_VAR).filter(|v| !v.is_empty())?;

        Some(AccountData {
            account_id: account_id.to_string(),
            save_data_id: save_data_id.to_string(),
        })
    }
}

/// Value of the first `var <name> = '...'` assignment in `html`.
///
/// Whitespace is required after `var` and optional around `=`. The value runs
/// up to the next single quote on the same line.
pub fn script_var<'a>(html: &'a str, name: &str) -> Option<&'a str> {
    let mut from = 0;
    while let Some(rel) = html[from..].find("var") {
        from += rel + "var".len();
        if let Some(value) = assignment_after_var(&html[from..], name) {
            return Some(value);
        }
    }
    None
}

fn assignment_after_var<'a>(rest: &'a str, name: &str) -> Option<&'a str> {
    let after_kw = rest.trim_start();
    if after_kw.len() == rest.len() {
        return None;
    }

    let after_eq = after_kw.strip_prefix(name)?.trim_start().strip_prefix('=')?;
    let quoted = after_eq.trim_start().strip_prefix('\'')?;

    let end = quoted.find(['\'', '\n'])?;
    quoted[end..].starts_with('\'').then(|| &quoted[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE_PAGE: &str = r#"
<html><head>
<script type="text/javascript">
    var USERS_ACCOUNT_ID = '1234567';
    var USERS_SAVEDATA_ID='89012345';
    var USERS_NICKNAME = 'Red';
</script>
</head><body></body></html>
"#;

    #[test]
    fn test_extracts_both_ids() {
        let data = ScriptVarExtractor.extract(PROFILE_PAGE).unwrap();
        assert_eq!(data.account_id, "1234567");
        assert_eq!(data.save_data_id, "89012345");
    }

    #[test]
    fn test_missing_save_data_id() {
        let html = "<script>var USERS_ACCOUNT_ID = '1234567';</script>";
        assert_eq!(ScriptVarExtractor.extract(html), None);
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let html = "var USERS_ACCOUNT_ID = ''; var USERS_SAVEDATA_ID = '42';";
        assert_eq!(ScriptVarExtractor.extract(html), None);
    }

    #[test]
    fn test_script_var_requires_exact_name() {
        let html = "var USERS_ACCOUNT_ID_OLD = 'stale'; var USERS_ACCOUNT_ID = 'fresh';";
        assert_eq!(script_var(html, ACCOUNT_ID_VAR), Some("fresh"));
    }

    #[test]
    fn test_script_var_requires_whitespace_after_var() {
        assert_eq!(script_var("varUSERS_ACCOUNT_ID = '1'", ACCOUNT_ID_VAR), None);
        assert_eq!(script_var("var\tUSERS_ACCOUNT_ID\n= '1'", ACCOUNT_ID_VAR), Some("1"));
    }

    #[test]
    fn test_script_var_ignores_unterminated_value() {
        let html = "var USERS_ACCOUNT_ID = '123\n';";
        assert_eq!(script_var(html, ACCOUNT_ID_VAR), None);
    }

    #[test]
    fn test_script_var_skips_other_var_keywords() {
        let html = "var a = 1; variable = 2; var USERS_SAVEDATA_ID = 'abc';";
        assert_eq!(script_var(html, SAVE_DATA_ID_VAR), Some("abc"));
    }
}
