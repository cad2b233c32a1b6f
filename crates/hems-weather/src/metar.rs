//! METAR decoding.

use crate::error::{FetchError, Product};
use crate::groups::{Conditions, DayTime};
use chrono::{DateTime, Utc};
use hems_core::WindVector;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

const HPA_PER_INHG: f64 = 33.8639;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendKind {
    Tempo,
    Becoming,
    NoSignificantChange,
}

/// Landing forecast appended to the observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trend {
    pub kind: TrendKind,
    /// Groups following the trend keyword, verbatim
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metar {
    pub raw: String,
    pub station: String,
    pub observed: DayTime,
    pub automatic: bool,
    #[serde(flatten)]
    pub conditions: Conditions,
    pub temperature_c: Option<i32>,
    pub dewpoint_c: Option<i32>,
    pub qnh_hpa: Option<u32>,
    pub trend: Option<Trend>,
    /// `RMK` text, or the military colour state when there is no `RMK`
    pub remarks: Option<String>,
}

impl Metar {
    /// Decode a METAR or SPECI, with or without the leading keyword and the
    /// terminating `=`.
    pub fn parse(raw: &str) -> Result<Self, FetchError> {
        let text = normalize(raw);
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let mut rest = tokens.as_slice();
        while let [first, tail @ ..] = rest {
            if matches!(*first, "METAR" | "SPECI" | "COR") {
                rest = tail;
            } else {
                break;
            }
        }

        let (station, rest) = take_station(rest, Product::Metar)?;
        let (observed, rest) = match rest.split_first() {
            Some((token, tail)) => match DayTime::parse_issue(token) {
                Some(observed) => (observed, tail),
                None => {
                    return Err(FetchError::parse(
                        Product::Metar,
                        format!("expected observation time, found {token:?}"),
                    ))
                }
            },
            None => return Err(FetchError::parse(Product::Metar, "missing observation time")),
        };

        let rmk_at = rest.iter().position(|t| *t == "RMK").unwrap_or(rest.len());
        let (body, remarks) = rest.split_at(rmk_at);
        let trend_at = body
            .iter()
            .position(|t| matches!(*t, "TEMPO" | "BECMG" | "NOSIG"))
            .unwrap_or(body.len());
        let (observation, trend) = body.split_at(trend_at);

        let mut metar = Metar {
            raw: text.clone(),
            station: station.to_string(),
            observed,
            automatic: false,
            conditions: Conditions::default(),
            temperature_c: None,
            dewpoint_c: None,
            qnh_hpa: None,
            trend: None,
            remarks: None,
        };

        for token in observation {
            if *token == "AUTO" {
                metar.automatic = true;
            } else if metar.conditions.absorb(token) {
                continue;
            } else if let Some((temperature, dewpoint)) = parse_temperature(token) {
                metar.temperature_c = Some(temperature);
                metar.dewpoint_c = dewpoint;
            } else if let Some(qnh) = parse_qnh(token) {
                metar.qnh_hpa.get_or_insert(qnh);
            } else if !is_colour_code(token) {
                tracing::trace!(station, token, "unrecognised METAR group");
            }
        }

        metar.trend = trend.split_first().map(|(keyword, detail)| Trend {
            kind: match *keyword {
                "TEMPO" => TrendKind::Tempo,
                "BECMG" => TrendKind::Becoming,
                _ => TrendKind::NoSignificantChange,
            },
            detail: detail.join(" "),
        });

        metar.remarks = match remarks.split_first() {
            Some((_, text)) if !text.is_empty() => Some(text.join(" ")),
            _ => {
                let colours: Vec<&str> = body.iter().copied().filter(|t| is_colour_code(t)).collect();
                (!colours.is_empty()).then(|| colours.join(" "))
            }
        };

        Ok(metar)
    }

    /// Reported mean wind, `None` when variable or missing.
    pub fn wind(&self) -> Option<WindVector> {
        self.conditions.wind.as_ref().and_then(|wind| wind.to_vector())
    }

    /// Temperature minus dewpoint.
    pub fn spread_c(&self) -> Option<i32> {
        Some(self.temperature_c? - self.dewpoint_c?)
    }

    pub fn observed_at(&self, reference: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.observed.resolve(reference)
    }
}

/// Collapse line breaks and runs of blanks, drop the terminating `=`.
pub(crate) fn normalize(raw: &str) -> String {
    let joined = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    joined.trim_end_matches('=').trim_end().to_string()
}

pub(crate) fn take_station<'a, 'b>(
    tokens: &'b [&'a str],
    product: Product,
) -> Result<(&'a str, &'b [&'a str]), FetchError> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^[A-Z][A-Z0-9]{3}$").unwrap());
    match tokens.split_first() {
        Some((station, tail)) if re.is_match(station) => Ok((*station, tail)),
        Some((token, _)) => Err(FetchError::parse(
            product,
            format!("expected station identifier, found {token:?}"),
        )),
        None => Err(FetchError::parse(product, "empty report")),
    }
}

fn parse_signed(value: &str) -> Option<i32> {
    match value.strip_prefix('M') {
        Some(magnitude) => magnitude.parse::<i32>().ok().map(|v| -v),
        None => value.parse().ok(),
    }
}

/// `TT/DD` with `M` for negative values; the dewpoint may be missing.
fn parse_temperature(token: &str) -> Option<(i32, Option<i32>)> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^(M?\d{2})/(M?\d{2})?$").unwrap());
    let caps = re.captures(token)?;
    let temperature = parse_signed(&caps[1])?;
    let dewpoint = caps.get(2).and_then(|m| parse_signed(m.as_str()));
    Some((temperature, dewpoint))
}

/// `Qhhhh` in hectopascals or `Annnn` in hundredths of an inch of mercury.
fn parse_qnh(token: &str) -> Option<u32> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^([QA])(\d{4})$").unwrap());
    let caps = re.captures(token)?;
    let value: u32 = caps[2].parse().ok()?;
    match &caps[1] {
        "Q" => Some(value),
        _ => Some((f64::from(value) / 100.0 * HPA_PER_INHG).round() as u32),
    }
}

fn is_colour_code(token: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"^(?:BLACK|(?:BLACK)?(?:BLU|WHT|GRN|YLO[12]?|AMB|RED)\+?)$").unwrap()
    });
    re.is_match(token)
}
