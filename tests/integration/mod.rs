mod yahoo_provider;

use serde_json::{json, Value};
use tick_stocks::models::PriceBar;

/// Render bars as a Yahoo v8 chart payload (timestamps at the 14:30 UTC open)
pub fn chart_payload(bars: &[PriceBar]) -> Value {
    let timestamps: Vec<i64> = bars
        .iter()
        .map(|b| b.date.and_hms_opt(14, 30, 0).unwrap().and_utc().timestamp())
        .collect();

    json!({
        "chart": {
            "result": [{
                "meta": { "currency": "USD", "dataGranularity": "1d" },
                "timestamp": timestamps,
                "indicators": { "quote": [{
                    "open": bars.iter().map(|b| b.open).collect::<Vec<_>>(),
                    "high": bars.iter().map(|b| b.high).collect::<Vec<_>>(),
                    "low": bars.iter().map(|b| b.low).collect::<Vec<_>>(),
                    "close": bars.iter().map(|b| b.close).collect::<Vec<_>>(),
                    "volume": bars.iter().map(|b| b.volume).collect::<Vec<_>>()
                }]}
            }],
            "error": null
        }
    })
}

pub fn not_found_payload() -> Value {
    json!({
        "chart": {
            "result": null,
            "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" }
        }
    })
}
