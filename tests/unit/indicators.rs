//! Indicator window and range properties

use pretty_assertions::assert_eq;
use tick_stocks::indicators;

use crate::common::{logging, test_data};

#[test]
fn test_sma_matches_trailing_mean_for_many_lengths() {
    logging::init_test_logging();

    for len in [1, 19, 20, 21, 45, 120] {
        let series = test_data::create_test_series(len);
        let rows = indicators::apply(&series);
        assert_eq!(rows.len(), len);

        for (i, row) in rows.iter().enumerate() {
            if i < 19 {
                assert!(row.sma20.is_none(), "len {} index {} should have no sma20", len, i);
            } else {
                let expected = series[i - 19..=i].iter().map(|b| b.close).sum::<f64>() / 20.0;
                let actual = row.sma20.expect("sma20 should be defined");
                assert!((actual - expected).abs() < 1e-9, "len {} index {}", len, i);
            }
        }
    }
}

#[test]
fn test_rsi_defined_range_and_bounds() {
    logging::init_test_logging();

    for len in [14, 15, 21, 90] {
        let rows = indicators::apply(&test_data::create_test_series(len));

        for (i, row) in rows.iter().enumerate() {
            match row.rsi14 {
                None => assert!(i < 13, "len {} index {} should have rsi14", len, i),
                Some(value) => {
                    assert!(i >= 13);
                    assert!((0.0..=100.0).contains(&value), "rsi {} out of range", value);
                }
            }
        }
    }
}

#[test]
fn test_twenty_one_daily_bars() {
    let rows = indicators::apply(&test_data::create_test_series(21));

    let with_sma = rows.iter().filter(|r| r.sma20.is_some()).count();
    let with_rsi = rows.iter().filter(|r| r.rsi14.is_some()).count();

    assert_eq!(with_sma, 2);
    assert_eq!(with_rsi, 8);
    assert!(rows[19].sma20.is_some() && rows[20].sma20.is_some());
    assert!(rows[13].rsi14.is_some());
    assert!(rows[12].rsi14.is_none());
}

#[test]
fn test_apply_is_deterministic() {
    let series = test_data::create_test_series(40);
    assert_eq!(indicators::apply(&series), indicators::apply(&series));
}
