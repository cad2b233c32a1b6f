//! TAF decoding: header, initial conditions and change groups.

use crate::error::{FetchError, Product};
use crate::groups::{Conditions, DayTime};
use crate::metar::{normalize, take_station};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// `ddhh/ddhh` period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityPeriod {
    pub from: DayTime,
    pub to: DayTime,
}

impl ValidityPeriod {
    pub fn parse(token: &str) -> Option<Self> {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| Regex::new(r"^(\d{2})(\d{2})/(\d{2})(\d{2})$").unwrap());
        let caps = re.captures(token)?;
        Some(Self {
            from: DayTime::new(caps[1].parse().ok()?, caps[2].parse().ok()?, 0),
            to: DayTime::new(caps[3].parse().ok()?, caps[4].parse().ok()?, 0),
        })
    }

    /// Start resolved against `reference`, end resolved against the start.
    pub fn resolve(&self, reference: DateTime<Utc>) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let from = self.from.resolve(reference)?;
        let to = self.to.resolve(from)?;
        Some((from, to))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    Tempo,
    Becoming,
    /// `FMddhhmm`: conditions change completely from the given time
    From,
    Probability(u8),
    ProbabilityTempo(u8),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeGroup {
    pub kind: ChangeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<ValidityPeriod>,
    /// Start of an `FM` group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<DayTime>,
    #[serde(flatten)]
    pub conditions: Conditions,
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Taf {
    pub raw: String,
    pub station: String,
    pub amended: bool,
    pub issued: DayTime,
    pub validity: ValidityPeriod,
    #[serde(flatten)]
    pub conditions: Conditions,
    pub changes: Vec<ChangeGroup>,
}

fn probability(token: &str) -> Option<u8> {
    token.strip_prefix("PROB")?.parse().ok()
}

fn from_time(token: &str) -> Option<DayTime> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^FM(\d{2})(\d{2})(\d{2})$").unwrap());
    let caps = re.captures(token)?;
    Some(DayTime::new(
        caps[1].parse().ok()?,
        caps[2].parse().ok()?,
        caps[3].parse().ok()?,
    ))
}

fn starts_change(token: &str) -> bool {
    matches!(token, "TEMPO" | "BECMG") || probability(token).is_some() || from_time(token).is_some()
}

impl ChangeGroup {
    fn parse(station: &str, tokens: &[&str]) -> Self {
        let (kind, from, rest) = match tokens {
            [prob, "TEMPO", rest @ ..] if probability(prob).is_some() => (
                ChangeKind::ProbabilityTempo(probability(prob).unwrap_or_default()),
                None,
                rest,
            ),
            ["TEMPO", rest @ ..] => (ChangeKind::Tempo, None, rest),
            ["BECMG", rest @ ..] => (ChangeKind::Becoming, None, rest),
            [first, rest @ ..] => match (probability(first), from_time(first)) {
                (Some(percent), _) => (ChangeKind::Probability(percent), None, rest),
                (None, Some(at)) => (ChangeKind::From, Some(at), rest),
                (None, None) => (ChangeKind::Tempo, None, rest),
            },
            [] => (ChangeKind::Tempo, None, tokens),
        };

        let (period, rest) = match rest.split_first() {
            Some((token, tail)) => match ValidityPeriod::parse(token) {
                Some(period) => (Some(period), tail),
                None => (None, rest),
            },
            None => (None, rest),
        };

        let mut conditions = Conditions::default();
        for token in rest {
            if !conditions.absorb(token) {
                tracing::trace!(station, token, "unrecognised TAF change group token");
            }
        }

        ChangeGroup {
            kind,
            period,
            from,
            conditions,
            raw: tokens.join(" "),
        }
    }
}

impl Taf {
    /// Decode a TAF, with or without the leading `TAF` keyword and the
    /// terminating `=`.
    pub fn parse(raw: &str) -> Result<Self, FetchError> {
        let text = normalize(raw);
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let mut amended = false;
        let mut rest = tokens.as_slice();
        while let [first, tail @ ..] = rest {
            match *first {
                "TAF" | "COR" => rest = tail,
                "AMD" => {
                    amended = true;
                    rest = tail;
                }
                _ => break,
            }
        }

        let (station, rest) = take_station(rest, Product::Taf)?;
        let (issued, rest) = match rest.split_first() {
            Some((token, tail)) => match DayTime::parse_issue(token) {
                Some(issued) => (issued, tail),
                None => {
                    return Err(FetchError::parse(
                        Product::Taf,
                        format!("expected issue time, found {token:?}"),
                    ))
                }
            },
            None => return Err(FetchError::parse(Product::Taf, "missing issue time")),
        };
        let (validity, rest) = match rest.split_first() {
            Some((token, tail)) => match ValidityPeriod::parse(token) {
                Some(validity) => (validity, tail),
                None => {
                    return Err(FetchError::parse(
                        Product::Taf,
                        format!("expected validity period, found {token:?}"),
                    ))
                }
            },
            None => return Err(FetchError::parse(Product::Taf, "missing validity period")),
        };

        // Split into the initial conditions and one slice per change group;
        // a PROBnn directly followed by TEMPO is a single group
        let mut sections: Vec<Vec<&str>> = vec![Vec::new()];
        for &token in rest {
            let joins_probability = token == "TEMPO"
                && matches!(sections.last().map(Vec::as_slice), Some([prob]) if probability(prob).is_some());
            if starts_change(token) && !joins_probability {
                sections.push(vec![token]);
            } else if let Some(section) = sections.last_mut() {
                section.push(token);
            }
        }

        let mut sections = sections.into_iter();
        let mut conditions = Conditions::default();
        for token in sections.next().unwrap_or_default() {
            if !conditions.absorb(token) {
                tracing::trace!(station, token, "unrecognised TAF token");
            }
        }
        let changes = sections
            .map(|section| ChangeGroup::parse(station, &section))
            .collect();

        Ok(Taf {
            raw: text.clone(),
            station: station.to_string(),
            amended,
            issued,
            validity,
            conditions,
            changes,
        })
    }

    pub fn issued_at(&self, reference: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.issued.resolve(reference)
    }

    /// Validity window, resolved relative to the issue time.
    pub fn valid_between(&self, reference: DateTime<Utc>) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let issued = self.issued_at(reference)?;
        self.validity.resolve(issued)
    }

    /// Whether any part of the forecast mentions a thunderstorm or CB.
    pub fn has_thunderstorm(&self) -> bool {
        self.conditions.has_thunderstorm()
            || self
                .changes
                .iter()
                .any(|change| change.conditions.has_thunderstorm())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const EDDF: &str = "TAF EDDF 181700Z 1818/1924 24010KT 9999 SCT035 \
        TEMPO 1818/1822 25015G28KT 4000 TSRA BKN030CB \
        BECMG 1900/1903 VRB03KT \
        PROB30 TEMPO 1903/1908 0800 FG \
        FM191200 27012KT CAVOK=";

    #[test]
    fn decodes_header_and_initial_conditions() {
        let taf = Taf::parse(EDDF).unwrap();
        assert_eq!(taf.station, "EDDF");
        assert!(!taf.amended);
        assert_eq!(taf.issued, DayTime::new(18, 17, 0));
        assert_eq!(taf.validity.from, DayTime::new(18, 18, 0));
        assert_eq!(taf.validity.to, DayTime::new(19, 24, 0));
        assert_eq!(taf.conditions.wind.unwrap().speed_kt, 10);
        assert_eq!(taf.conditions.visibility_m, Some(9999));
        assert_eq!(taf.conditions.clouds.len(), 1);
        assert!(taf.conditions.weather.is_empty());
    }

    #[test]
    fn splits_change_groups() {
        let taf = Taf::parse(EDDF).unwrap();
        let kinds: Vec<_> = taf.changes.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            [
                ChangeKind::Tempo,
                ChangeKind::Becoming,
                ChangeKind::ProbabilityTempo(30),
                ChangeKind::From,
            ]
        );

        let tempo = &taf.changes[0];
        assert_eq!(tempo.period.unwrap().to, DayTime::new(18, 22, 0));
        assert_eq!(tempo.conditions.wind.unwrap().gust_kt, Some(28));
        assert_eq!(tempo.conditions.visibility_m, Some(4000));
        assert!(tempo.conditions.has_thunderstorm());

        let prob = &taf.changes[2];
        assert_eq!(prob.conditions.visibility_m, Some(800));
        assert_eq!(prob.raw, "PROB30 TEMPO 1903/1908 0800 FG");

        let from = &taf.changes[3];
        assert_eq!(from.from, Some(DayTime::new(19, 12, 0)));
        assert!(from.period.is_none());
        assert!(from.conditions.cavok);

        assert!(taf.has_thunderstorm());
    }

    #[test]
    fn amended_taf_and_plain_probability() {
        let taf = Taf::parse("TAF AMD EDDM 181830Z 1818/1918 22008KT 9999 FEW040 PROB40 1818/1820 3000 SHRA").unwrap();
        assert!(taf.amended);
        assert_eq!(taf.changes.len(), 1);
        assert_eq!(taf.changes[0].kind, ChangeKind::Probability(40));
        assert_eq!(taf.changes[0].conditions.visibility_m, Some(3000));
    }

    #[test]
    fn validity_resolves_across_month_end() {
        let taf = Taf::parse("EDDH 301700Z 3018/0124 27010KT 9999 BKN020").unwrap();
        let reference = Utc.with_ymd_and_hms(2024, 6, 30, 17, 5, 0).unwrap();
        let (from, to) = taf.valid_between(reference).unwrap();
        assert_eq!(from, Utc.with_ymd_and_hms(2024, 6, 30, 18, 0, 0).unwrap());
        assert_eq!(to, Utc.with_ymd_and_hms(2024, 7, 2, 0, 0, 0).unwrap());
    }

    #[test]
    fn nil_and_truncated_tafs_are_rejected() {
        assert!(matches!(
            Taf::parse("TAF EDDF 181700Z NIL="),
            Err(FetchError::Parse {
                product: Product::Taf,
                ..
            })
        ));
        assert!(Taf::parse("TAF EDDF").is_err());
        assert!(Taf::parse("TAF").is_err());
    }
}
