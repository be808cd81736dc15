//! Technical indicator implementations.
//!
//! Every calculation returns a [`Series`] with the same length as its input;
//! `None` marks bars where the indicator is unavailable (warm-up, or a
//! non-finite result).
//!
//! [`IndicatorType`] names an indicator with its parameters. It is hashable so
//! it can key a map, and it owns the field names the enricher publishes.

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod stochastic;

pub use atr::calculate_atr;
pub use bollinger::{calculate_bollinger, BollingerBands};
pub use ema::calculate_ema;
pub use macd::{calculate_macd, MacdOutput};
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;
pub use stochastic::{calculate_stochastic, StochasticOutput};

use std::fmt;

/// Indicator values aligned to the input bars.
pub type Series = Vec<Option<f64>>;

pub(crate) fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Apply `calc` to the contiguous run of defined values that starts at the
/// first defined index, then place the results back at their original indices.
pub(crate) fn map_defined_prefix<F>(series: &[Option<f64>], calc: F) -> Series
where
    F: Fn(&[f64]) -> Series,
{
    let mut out = vec![None; series.len()];
    let Some(start) = series.iter().position(Option::is_some) else {
        return out;
    };

    let run: Vec<f64> = series[start..].iter().map_while(|v| *v).collect();
    for (offset, value) in calc(&run).into_iter().enumerate() {
        out[start + offset] = value;
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Rsi(usize),
    Atr(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    Bollinger {
        period: usize,
        stddev_mult_x100: u32,
    },
    Stochastic {
        period: usize,
        k_smooth: usize,
        d_period: usize,
    },
}

impl IndicatorType {
    pub fn default_macd() -> Self {
        IndicatorType::Macd {
            fast: macd::DEFAULT_FAST,
            slow: macd::DEFAULT_SLOW,
            signal: macd::DEFAULT_SIGNAL,
        }
    }

    pub fn default_bollinger() -> Self {
        IndicatorType::Bollinger {
            period: bollinger::DEFAULT_PERIOD,
            stddev_mult_x100: bollinger::DEFAULT_MULT_X100,
        }
    }

    pub fn default_stochastic() -> Self {
        IndicatorType::Stochastic {
            period: stochastic::DEFAULT_PERIOD,
            k_smooth: stochastic::DEFAULT_K_SMOOTH,
            d_period: stochastic::DEFAULT_D_PERIOD,
        }
    }

    /// Field-name prefix. Indicators at their conventional parameters get a
    /// bare name (`rsi`, `macd`, `bb`); anything else carries its parameters.
    pub fn key(&self) -> String {
        match self {
            IndicatorType::Sma(period) => format!("sma_{}", period),
            IndicatorType::Ema(period) => format!("ema_{}", period),
            IndicatorType::Rsi(period) if *period == rsi::DEFAULT_PERIOD => "rsi".to_string(),
            IndicatorType::Rsi(period) => format!("rsi_{}", period),
            IndicatorType::Atr(period) if *period == atr::DEFAULT_PERIOD => "atr".to_string(),
            IndicatorType::Atr(period) => format!("atr_{}", period),
            IndicatorType::Macd { fast, slow, signal } => {
                if *self == Self::default_macd() {
                    "macd".to_string()
                } else {
                    format!("macd_{}_{}_{}", fast, slow, signal)
                }
            }
            IndicatorType::Bollinger {
                period,
                stddev_mult_x100,
            } => {
                if *self == Self::default_bollinger() {
                    "bb".to_string()
                } else {
                    let mult = *stddev_mult_x100 as f64 / 100.0;
                    format!("bb_{}_{}", period, mult)
                }
            }
            IndicatorType::Stochastic {
                period,
                k_smooth,
                d_period,
            } => {
                if *self == Self::default_stochastic() {
                    "stoch".to_string()
                } else {
                    format!("stoch_{}_{}_{}", period, k_smooth, d_period)
                }
            }
        }
    }

    /// Snapshot field names this indicator produces, in output order.
    pub fn field_names(&self) -> Vec<String> {
        let key = self.key();
        match self {
            IndicatorType::Sma(_)
            | IndicatorType::Ema(_)
            | IndicatorType::Rsi(_)
            | IndicatorType::Atr(_) => vec![key],
            IndicatorType::Macd { .. } => vec![
                key.clone(),
                format!("{}_signal", key),
                format!("{}_histogram", key),
            ],
            IndicatorType::Bollinger { .. } => vec![
                format!("{}_upper", key),
                format!("{}_middle", key),
                format!("{}_lower", key),
            ],
            IndicatorType::Stochastic { .. } => {
                vec![format!("{}_k", key), format!("{}_d", key)]
            }
        }
    }

    /// Recognise a snapshot field name such as `sma_30`, `rsi`, `bb_upper`
    /// or `macd_5_35_5_signal`. Only names the indicator would publish
    /// itself are accepted, so `rsi_14` is rejected in favour of `rsi`.
    pub fn from_field_name(name: &str) -> Option<Self> {
        let parts: Vec<&str> = name.split('_').collect();
        let indicator = match parts.as_slice() {
            ["sma", p] => IndicatorType::Sma(parse_period(p)?),
            ["ema", p] => IndicatorType::Ema(parse_period(p)?),
            ["rsi"] => IndicatorType::Rsi(rsi::DEFAULT_PERIOD),
            ["rsi", p] => IndicatorType::Rsi(parse_period(p)?),
            ["atr"] => IndicatorType::Atr(atr::DEFAULT_PERIOD),
            ["atr", p] => IndicatorType::Atr(parse_period(p)?),
            ["macd"] | ["macd", "signal" | "histogram"] => Self::default_macd(),
            ["macd", f, s, g] | ["macd", f, s, g, "signal" | "histogram"] => IndicatorType::Macd {
                fast: parse_period(f)?,
                slow: parse_period(s)?,
                signal: parse_period(g)?,
            },
            ["bb", "upper" | "middle" | "lower"] => Self::default_bollinger(),
            ["bb", p, m, "upper" | "middle" | "lower"] => IndicatorType::Bollinger {
                period: parse_period(p)?,
                stddev_mult_x100: parse_multiplier(m)?,
            },
            ["stoch", "k" | "d"] => Self::default_stochastic(),
            ["stoch", p, k, d, "k" | "d"] => IndicatorType::Stochastic {
                period: parse_period(p)?,
                k_smooth: parse_period(k)?,
                d_period: parse_period(d)?,
            },
            _ => return None,
        };

        indicator
            .field_names()
            .iter()
            .any(|f| f == name)
            .then_some(indicator)
    }
}

fn parse_period(s: &str) -> Option<usize> {
    s.parse::<usize>().ok().filter(|p| *p > 0)
}

fn parse_multiplier(s: &str) -> Option<u32> {
    let mult: f64 = s.parse().ok()?;
    if !mult.is_finite() || mult <= 0.0 {
        return None;
    }
    Some((mult * 100.0).round() as u32)
}

/// Indicators every run publishes regardless of what the rules reference.
pub fn default_indicators() -> Vec<IndicatorType> {
    vec![
        IndicatorType::Sma(50),
        IndicatorType::Sma(200),
        IndicatorType::Ema(9),
        IndicatorType::Ema(21),
        IndicatorType::Rsi(rsi::DEFAULT_PERIOD),
        IndicatorType::default_macd(),
        IndicatorType::default_bollinger(),
        IndicatorType::Atr(atr::DEFAULT_PERIOD),
        IndicatorType::default_stochastic(),
    ]
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Atr(period) => write!(f, "ATR({})", period),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
            IndicatorType::Bollinger {
                period,
                stddev_mult_x100,
            } => {
                let mult = *stddev_mult_x100 as f64 / 100.0;
                write!(f, "BOLLINGER({},{})", period, mult)
            }
            IndicatorType::Stochastic {
                period,
                k_smooth,
                d_period,
            } => write!(f, "STOCHASTIC({},{},{})", period, k_smooth, d_period),
        }
    }
}
