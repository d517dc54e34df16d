use std::cmp::Ordering;

use serde::Serialize;

use crate::models::ValidatorRecord;

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SortColumn {
    Index,
    Stake,
    AvgEfficiency,
    Adnl,
}

impl SortColumn {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "index" => Some(SortColumn::Index),
            "stake" => Some(SortColumn::Stake),
            "avgEfficiency" => Some(SortColumn::AvgEfficiency),
            "adnl" => Some(SortColumn::Adnl),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }
}

/// The one active sort of the validator table.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl Default for SortOrder {
    /// The list opens on stake, largest first.
    fn default() -> Self {
        SortOrder {
            column: SortColumn::Stake,
            direction: SortDirection::Desc,
        }
    }
}

impl SortOrder {
    /// Clicking the active ascending column flips it to descending;
    /// every other click sorts the clicked column ascending.
    pub fn toggled(self, column: SortColumn) -> SortOrder {
        if self.column == column && self.direction == SortDirection::Asc {
            SortOrder {
                column,
                direction: SortDirection::Desc,
            }
        } else {
            SortOrder {
                column,
                direction: SortDirection::Asc,
            }
        }
    }

    pub fn apply(self, records: &mut [ValidatorRecord]) {
        records.sort_by(|a, b| {
            let ordering = match self.column {
                SortColumn::Index => a.index.cmp(&b.index),
                SortColumn::Stake => a.stake.partial_cmp(&b.stake).unwrap_or(Ordering::Equal),
                SortColumn::AvgEfficiency => a
                    .avg_efficiency
                    .partial_cmp(&b.avg_efficiency)
                    .unwrap_or(Ordering::Equal),
                SortColumn::Adnl => a.adnl.cmp(&b.adnl),
            };
            match self.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }
}

/// Abbreviates large magnitudes for table cells: 2500000000 -> "2.5B",
/// 1500 -> "1.5K", 999 -> "999". Values under a thousand render as-is.
pub fn format_number_to_text(num: f64) -> String {
    let abs = num.abs();
    if abs >= 1.0e9 {
        format!("{:.1}B", num / 1.0e9)
    } else if abs >= 1.0e6 {
        format!("{:.1}M", num / 1.0e6)
    } else if abs >= 1.0e3 {
        format!("{:.1}K", num / 1.0e3)
    } else if num == num.trunc() {
        format!("{}", num as i64)
    } else {
        format!("{}", num)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(adnl: &str, stake: f64, index: u32, avg_efficiency: f64) -> ValidatorRecord {
        ValidatorRecord {
            adnl: adnl.to_string(),
            stake,
            weight: 0.0,
            index,
            wallet_address: String::new(),
            avg_efficiency,
            statuses: Vec::new(),
        }
    }

    fn fixture() -> Vec<ValidatorRecord> {
        vec![
            record("bbb", 500.0, 2, 90.0),
            record("aaa", 900.0, 1, 70.0),
            record("ccc", 100.0, 3, 95.0),
        ]
    }

    fn adnls(records: &[ValidatorRecord]) -> Vec<&str> {
        records.iter().map(|r| r.adnl.as_str()).collect()
    }

    #[test]
    fn default_order_is_stake_descending() {
        let mut records = fixture();
        SortOrder::default().apply(&mut records);
        assert_eq!(adnls(&records), vec!["aaa", "bbb", "ccc"]);
    }

    #[test]
    fn toggling_the_same_column_flips_direction() {
        let order = SortOrder {
            column: SortColumn::Stake,
            direction: SortDirection::Asc,
        };
        let mut records = fixture();
        order.apply(&mut records);
        assert_eq!(adnls(&records), vec!["ccc", "bbb", "aaa"]);

        let flipped = order.toggled(SortColumn::Stake);
        assert_eq!(flipped.direction, SortDirection::Desc);
        let mut records = fixture();
        flipped.apply(&mut records);
        assert_eq!(adnls(&records), vec!["aaa", "bbb", "ccc"]);
    }

    #[test]
    fn selecting_a_new_column_resets_to_ascending() {
        let order = SortOrder {
            column: SortColumn::Stake,
            direction: SortDirection::Desc,
        };
        let toggled = order.toggled(SortColumn::AvgEfficiency);
        assert_eq!(toggled.column, SortColumn::AvgEfficiency);
        assert_eq!(toggled.direction, SortDirection::Asc);

        let mut records = fixture();
        toggled.apply(&mut records);
        assert_eq!(adnls(&records), vec!["aaa", "bbb", "ccc"]);
    }

    #[test]
    fn adnl_sorts_lexicographically() {
        let order = SortOrder {
            column: SortColumn::Adnl,
            direction: SortDirection::Asc,
        };
        let mut records = fixture();
        order.apply(&mut records);
        assert_eq!(adnls(&records), vec!["aaa", "bbb", "ccc"]);
    }

    #[test]
    fn index_sorts_numerically() {
        let order = SortOrder {
            column: SortColumn::Index,
            direction: SortDirection::Asc,
        };
        let mut records = fixture();
        order.apply(&mut records);
        assert_eq!(adnls(&records), vec!["aaa", "bbb", "ccc"]);
    }

    #[test]
    fn formats_magnitude_suffixes() {
        assert_eq!(format_number_to_text(2500000000.0), "2.5B");
        assert_eq!(format_number_to_text(1200000.0), "1.2M");
        assert_eq!(format_number_to_text(1500.0), "1.5K");
        assert_eq!(format_number_to_text(999.0), "999");
        assert_eq!(format_number_to_text(0.0), "0");
    }

    #[test]
    fn small_fractional_values_render_as_is() {
        assert_eq!(format_number_to_text(12.5), "12.5");
    }

    #[test]
    fn negative_values_keep_their_sign() {
        assert_eq!(format_number_to_text(-1500.0), "-1.5K");
        assert_eq!(format_number_to_text(-999.0), "-999");
    }
}
