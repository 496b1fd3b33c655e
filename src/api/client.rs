//! Pokemon Global Link client for fetching a player's GTS trade history.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Response, Url};
use tracing::{debug, info, warn};

use crate::config::{GtsConfig, Language};
use crate::error::GtsError;
use crate::models::{AccountData, Trade, TradePage};

use super::scrape::{AccountDataExtractor, ScriptVarExtractor};
use super::types::{TradeListForm, TradeListResponse};

const TRADE_LIST_PATH: &str = "/frontendApi/mypage/getGtsTradeList";
const MYPAGE_TAB: &str = "gts";

/// Page size used when walking the whole history.
pub const TRADES_PER_PAGE: u32 = 5;

/// Client for one player's GTS trade history.
///
/// The account and save-data ids are scraped from the profile page the first
/// time a trade request needs them, then reused for the life of the client.
pub struct GtsClient {
    http: Client,
    config: GtsConfig,
    extractor: Box<dyn AccountDataExtractor>,
    profile_id: String,
    account_id: Option<String>,
    save_data_id: Option<String>,
}

impl GtsClient {
    /// Create a client for `profile_id` with default settings.
    pub fn new(profile_id: impl Into<String>) -> Result<Self> {
        Self::with_config(profile_id, GtsConfig::default())
    }

    /// Create with custom settings (base URL, language, timezone, timeout).
    pub fn with_config(profile_id: impl Into<String>, config: GtsConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            config,
            extractor: Box::new(ScriptVarExtractor),
            profile_id: profile_id.into(),
            account_id: None,
            save_data_id: None,
        })
    }

    /// Inject already-known ids so the profile page is never scraped.
    pub fn with_account_data(
        mut self,
        account_id: impl Into<String>,
        save_data_id: impl Into<String>,
    ) -> Self {
        self.account_id = Some(account_id.into());
        self.save_data_id = Some(save_data_id.into());
        self
    }

    /// Replace the profile page extraction strategy.
    pub fn with_extractor(mut self, extractor: impl AccountDataExtractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    pub fn profile_id(&self) -> &str {
        &self.profile_id
    }

    pub fn account_id(&self) -> Option<&str> {
        self.account_id.as_deref()
    }

    pub fn save_data_id(&self) -> Option<&str> {
        self.save_data_id.as_deref()
    }

    pub fn set_account_id(&mut self, account_id: impl Into<String>) {
        self.account_id = Some(account_id.into());
    }

    pub fn set_save_data_id(&mut self, save_data_id: impl Into<String>) {
        self.save_data_id = Some(save_data_id.into());
    }

    pub fn language(&self) -> Language {
        self.config.language
    }

    /// Language for subsequent trade requests.
    pub fn set_language(&mut self, language: Language) {
        self.config.language = language;
    }

    /// True once both ids are known and non-empty.
    pub fn has_account_data(&self) -> bool {
        self.known_account_data().is_some()
    }

    fn known_account_data(&self) -> Option<AccountData> {
        match (self.account_id.as_deref(), self.save_data_id.as_deref()) {
            (Some(account_id), Some(save_data_id))
                if !account_id.is_empty() && !save_data_id.is_empty() =>
            {
                Some(AccountData {
                    account_id: account_id.to_string(),
                    save_data_id: save_data_id.to_string(),
                })
            }
            _ => None,
        }
    }

    /// Profile page URL; also the Referer of trade-list requests.
    pub fn profile_url(&self) -> String {
        format!("{}/user/{}/gts/", self.config.base_url, self.profile_id)
    }

    fn trade_list_url(&self) -> String {
        format!("{}{}", self.config.base_url, TRADE_LIST_PATH)
    }

    /// Scrape the account and save-data ids from the profile page.
    ///
    /// Fails with [`GtsError::AccountDataNotFound`] when either id is missing,
    /// which usually means the profile is private.
    pub async fn fetch_account_data(&mut self) -> Result<AccountData> {
        let url = self.profile_url();

        debug!(url = %url, profile_id = %self.profile_id, "Fetching profile page");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .context("Failed to fetch profile page")?;

        let html = checked(response)
            .await?
            .text()
            .await
            .context("Failed to read profile page")?;

        let extracted = self
            .extractor
            .extract(&html)
            .filter(|d| !d.account_id.is_empty() && !d.save_data_id.is_empty());

        let Some(data) = extracted else {
            warn!(url = %url, profile_id = %self.profile_id, "Account data not found in profile page");
            self.account_id = None;
            self.save_data_id = None;
            return Err(GtsError::AccountDataNotFound {
                url,
                profile_id: self.profile_id.clone(),
            }
            .into());
        };

        info!(
            profile_id = %self.profile_id,
            account_id = %data.account_id,
            save_data_id = %data.save_data_id,
            "Discovered account data"
        );

        self.account_id = Some(data.account_id.clone());
        self.save_data_id = Some(data.save_data_id.clone());

        Ok(data)
    }

    /// Fetch one page of trades, newest first. `page` starts at 1.
    pub async fn fetch_trade_page(&mut self, count: u32, page: u32) -> Result<TradePage> {
        let account = match self.known_account_data() {
            Some(account) => account,
            None => self.fetch_account_data().await?,
        };

        let form = TradeListForm {
            language_id: self.config.language.id(),
            member_savedata_id_code: &self.profile_id,
            account_id: &account.account_id,
            savedata_id: &account.save_data_id,
            count,
            page,
            mypage_tab: MYPAGE_TAB,
            time_stamp: Utc::now().timestamp(),
        };

        let url = self.trade_list_url();

        debug!(
            url = %url,
            page = page,
            count = count,
            language = %self.config.language,
            "Fetching trade page"
        );

        // Headers go after the form so our Content-Type (with charset) wins.
        let response = self
            .http
            .post(&url)
            .form(&form)
            .headers(self.trade_list_headers()?)
            .send()
            .await
            .context("Failed to fetch trade list")?;

        let body: TradeListResponse = checked(response)
            .await?
            .json()
            .await
            .context("Failed to parse trade list response")?;

        let tz = self.config.timezone;
        let trade_list = body
            .trade_list
            .into_iter()
            .map(|t| Trade::new(t.fields, tz))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            page = page,
            trades = trade_list.len(),
            total = body.total_count,
            "Fetched trade page"
        );

        Ok(TradePage {
            trade_list,
            total_count: body.total_count,
        })
    }

    /// The most recent trade.
    pub async fn fetch_latest_trade(&mut self) -> Result<Trade> {
        let page = self.fetch_trade_page(1, 1).await?;
        let trade = page
            .trade_list
            .into_iter()
            .next()
            .ok_or(GtsError::EmptyTradeList)?;

        Ok(trade)
    }

    /// All trades strictly newer than `since`, newest first.
    ///
    /// Pages are assumed sorted newest first: the walk stops at the first trade
    /// that is not newer, or once the pages fetched cover `totalCount`.
    pub async fn fetch_trades_since(&mut self, since: DateTime<Utc>) -> Result<Vec<Trade>> {
        let mut trades = Vec::new();
        let mut page = 1u32;

        loop {
            let result = self.fetch_trade_page(TRADES_PER_PAGE, page).await?;

            let mut still_newer = false;
            for trade in result.trade_list {
                still_newer = trade.is_newer_than(since);
                if !still_newer {
                    break;
                }
                trades.push(trade);
            }

            let covered = u64::from(page) * u64::from(TRADES_PER_PAGE);
            if covered >= result.total_count || !still_newer {
                break;
            }
            page += 1;
        }

        debug!(since = %since, pages = page, trades = trades.len(), "Fetched trades since");

        Ok(trades)
    }

    /// The whole trade history, newest first.
    pub async fn fetch_all_trades(&mut self) -> Result<Vec<Trade>> {
        self.fetch_trades_since(DateTime::<Utc>::UNIX_EPOCH).await
    }

    /// Headers the portal's own page sends with trade-list requests.
    fn trade_list_headers(&self) -> Result<HeaderMap> {
        let base = Url::parse(&self.config.base_url).context("Invalid base URL")?;
        let host = match (base.host_str(), base.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => anyhow::bail!("Base URL has no host: {}", self.config.base_url),
        };

        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_str(&host).context("Invalid Host header")?);
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
        headers.insert(
            header::ORIGIN,
            HeaderValue::from_str(&self.config.base_url).context("Invalid Origin header")?,
        );
        headers.insert("x-requested-with", HeaderValue::from_static("XMLHttpRequest"));
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded; charset=UTF-8"),
        );
        headers.insert(
            header::REFERER,
            HeaderValue::from_str(&self.profile_url()).context("Invalid Referer header")?,
        );

        Ok(headers)
    }
}

/// Turn a non-success status into [`GtsError::RequestFailed`].
async fn checked(response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(GtsError::RequestFailed { status, body }.into())
}
