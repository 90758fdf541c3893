//! Parsing of the token dashboard: symbol and top-traders rows.

use super::locators::{compile, Locators};
use crate::error::{Result, ScrapeError};
use crate::types::{TokenInfo, WalletCandidate};
use scraper::{ElementRef, Html};
use tracing::{debug, warn};

/// Read the token symbol. A missing node yields the `--` sentinel.
pub fn parse_token_symbol(html: &str, locators: &Locators) -> Result<TokenInfo> {
    let document = Html::parse_document(html);
    let selector = compile(&locators.token_symbol)?;

    let raw = document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>());
    if raw.is_none() {
        warn!("no token symbol found");
    }
    Ok(TokenInfo::from_raw(raw.as_deref()))
}

/// Parse the bought-price text of a trader row.
///
/// Abbreviated amounts (`12K`, `3.4M`) and the `-` placeholder are not plain
/// numbers and yield `None`, as does anything else that fails to parse.
pub fn parse_price(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() || text == "-" || text.ends_with('K') || text.ends_with('M') {
        return None;
    }
    let cleaned = text.replace('$', "").replace(',', "");
    match cleaned.parse::<f64>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("unexpected price text: {text:?}");
            None
        }
    }
}

/// Last path segment of a wallet link, e.g. `/solana/maker/ABC` -> `ABC`.
pub fn wallet_from_href(href: &str) -> Option<String> {
    let segment = href.rsplit('/').next()?.trim();
    (!segment.is_empty()).then(|| segment.to_string())
}

/// List trader rows that carry a plain price at or under `max_price` and a
/// resolvable wallet link, in document order.
///
/// Fails with [`ScrapeError::NotFound`] when the table itself is absent: the
/// dashboard renders no trader list for addresses it does not know.
pub fn parse_wallet_candidates(
    html: &str,
    locators: &Locators,
    token_address: &str,
    max_price: f64,
) -> Result<Vec<WalletCandidate>> {
    let document = Html::parse_document(html);
    let table_sel = compile(&locators.traders_table)?;
    let price_sel = compile(&locators.trader_row.price)?;
    let link_sel = compile(&locators.trader_row.wallet_link)?;

    let table = document
        .select(&table_sel)
        .next()
        .ok_or_else(|| ScrapeError::NotFound {
            address: token_address.to_string(),
        })?;

    let mut candidates = Vec::new();
    for (index, row) in table.children().filter_map(ElementRef::wrap).enumerate() {
        let columns: Vec<ElementRef<'_>> = row.children().filter_map(ElementRef::wrap).collect();

        let price = columns
            .get(locators.trader_row.price_column)
            .and_then(|col| col.select(&price_sel).next())
            .map(|el| el.text().collect::<String>())
            .and_then(|text| parse_price(&text));
        let price = match price {
            Some(p) if p != 0.0 && p <= max_price => p,
            _ => {
                debug!("row {index}: price missing or out of range, skipped");
                continue;
            }
        };

        let address = columns
            .last()
            .and_then(|col| col.select(&link_sel).next())
            .and_then(|a| a.value().attr("href"))
            .and_then(wallet_from_href);
        let Some(address) = address else {
            debug!("row {index}: no wallet link, skipped");
            continue;
        };

        candidates.push(WalletCandidate { price, address });
    }

    Ok(candidates)
}
