//! Report groups shared by METAR and TAF decoding: wind, visibility,
//! present weather, cloud layers and day/time stamps.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use hems_core::WindVector;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

const KT_PER_MPS: f64 = 1.943844;
const METRES_PER_SM: f64 = 1609.344;

/// Reported visibility of 10 km or more.
pub const UNLIMITED_VISIBILITY_M: u32 = 9999;

/// Day of month and UTC time as written in a report, before the month and
/// year are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTime {
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

impl DayTime {
    pub fn new(day: u32, hour: u32, minute: u32) -> Self {
        Self { day, hour, minute }
    }

    /// Place the stamp in whichever of the previous, current or next month
    /// (relative to `reference`) puts it closest to `reference`.
    ///
    /// Hour 24 is midnight at the end of the day, as used in TAF validity.
    pub fn resolve(&self, reference: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if self.hour > 24 || self.minute > 59 || (self.hour == 24 && self.minute != 0) {
            return None;
        }
        let (hour, carry) = if self.hour == 24 {
            (0, Duration::days(1))
        } else {
            (self.hour, Duration::zero())
        };

        [-1, 0, 1]
            .into_iter()
            .filter_map(|offset| {
                let (year, month) = shift_month(reference.year(), reference.month(), offset);
                NaiveDate::from_ymd_opt(year, month, self.day)?.and_hms_opt(hour, self.minute, 0)
            })
            .map(|naive| naive.and_utc() + carry)
            .min_by_key(|at| (*at - reference).num_seconds().abs())
    }

    /// `ddhhmmZ`
    pub(crate) fn parse_issue(token: &str) -> Option<Self> {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| Regex::new(r"^(\d{2})(\d{2})(\d{2})Z$").unwrap());
        let caps = re.captures(token)?;
        Some(Self::new(
            caps[1].parse().ok()?,
            caps[2].parse().ok()?,
            caps[3].parse().ok()?,
        ))
    }
}

fn shift_month(year: i32, month: u32, offset: i32) -> (i32, u32) {
    let index = year * 12 + month as i32 - 1 + offset;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindDirection {
    Degrees(u16),
    Variable,
}

/// Surface wind group, speeds in knots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindGroup {
    pub direction: WindDirection,
    pub speed_kt: u16,
    pub gust_kt: Option<u16>,
}

impl WindGroup {
    /// `dddssKT`, `dddssGggKT`, `VRBssKT`; `MPS` groups are converted to knots.
    pub fn parse(token: &str) -> Option<Self> {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| {
            Regex::new(r"^(\d{3}|VRB)(\d{2,3})(?:G(\d{2,3}))?(KT|MPS)$").unwrap()
        });
        let caps = re.captures(token)?;
        let direction = match &caps[1] {
            "VRB" => WindDirection::Variable,
            degrees => WindDirection::Degrees(degrees.parse().ok()?),
        };
        let to_knots = |value: u16| -> u16 {
            if &caps[4] == "MPS" {
                (f64::from(value) * KT_PER_MPS).round() as u16
            } else {
                value
            }
        };
        let speed_kt = to_knots(caps[2].parse().ok()?);
        let gust_kt = match caps.get(3) {
            Some(gust) => Some(to_knots(gust.as_str().parse().ok()?)),
            None => None,
        };
        Some(Self {
            direction,
            speed_kt,
            gust_kt,
        })
    }

    /// Mean wind for the reachability engine. Variable wind has no usable
    /// direction.
    pub fn to_vector(&self) -> Option<WindVector> {
        match self.direction {
            WindDirection::Degrees(degrees) => {
                Some(WindVector::new(f64::from(degrees), f64::from(self.speed_kt)))
            }
            WindDirection::Variable => None,
        }
    }
}

/// `dddVddd`: extremes of a varying wind direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableSector {
    pub from_deg: u16,
    pub to_deg: u16,
}

impl VariableSector {
    pub fn parse(token: &str) -> Option<Self> {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| Regex::new(r"^(\d{3})V(\d{3})$").unwrap());
        let caps = re.captures(token)?;
        Some(Self {
            from_deg: caps[1].parse().ok()?,
            to_deg: caps[2].parse().ok()?,
        })
    }
}

/// Prevailing visibility in metres. Statute-mile groups are converted and
/// capped at 9999.
pub fn parse_visibility(token: &str) -> Option<u32> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^(?:(\d{4})(?:NDV|NE|NW|SE|SW|N|E|S|W)?|(P)?(\d{1,2})SM)$").unwrap());
    let caps = re.captures(token)?;
    if let Some(metres) = caps.get(1) {
        return metres.as_str().parse().ok();
    }
    if caps.get(2).is_some() {
        return Some(UNLIMITED_VISIBILITY_M);
    }
    let miles: f64 = caps[3].parse().ok()?;
    Some(((miles * METRES_PER_SM).round() as u32).min(UNLIMITED_VISIBILITY_M))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CloudCover {
    Few,
    Scattered,
    Broken,
    Overcast,
}

impl CloudCover {
    pub fn code(&self) -> &'static str {
        match self {
            CloudCover::Few => "FEW",
            CloudCover::Scattered => "SCT",
            CloudCover::Broken => "BKN",
            CloudCover::Overcast => "OVC",
        }
    }

    /// Broken or overcast.
    pub fn is_ceiling(&self) -> bool {
        matches!(self, CloudCover::Broken | CloudCover::Overcast)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudLayer {
    pub cover: CloudCover,
    /// Base above aerodrome level in feet
    pub height_ft: u32,
    /// `CB` or `TCU`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub convective: Option<String>,
}

impl CloudLayer {
    /// `FEW020`, `BKN008CB`, ...
    pub fn parse(token: &str) -> Option<Self> {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| Regex::new(r"^(FEW|SCT|BKN|OVC)(\d{3})(CB|TCU)?$").unwrap());
        let caps = re.captures(token)?;
        let cover = match &caps[1] {
            "FEW" => CloudCover::Few,
            "SCT" => CloudCover::Scattered,
            "BKN" => CloudCover::Broken,
            _ => CloudCover::Overcast,
        };
        let hundreds: u32 = caps[2].parse().ok()?;
        Some(Self {
            cover,
            height_ft: hundreds * 100,
            convective: caps.get(3).map(|m| m.as_str().to_string()),
        })
    }
}

/// Present or forecast weather such as `-SHRA` or `+TSRA`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherGroup {
    pub code: String,
    pub description: String,
}

const DESCRIPTORS: &[(&str, &str)] = &[
    ("MI", "Shallow"),
    ("BC", "Patches"),
    ("PR", "Partial"),
    ("DR", "Drifting"),
    ("BL", "Blowing"),
    ("SH", "Showers"),
    ("TS", "Thunderstorm"),
    ("FZ", "Freezing"),
];

const PHENOMENA: &[(&str, &str)] = &[
    ("DZ", "Drizzle"),
    ("RA", "Rain"),
    ("SN", "Snow"),
    ("SG", "Snow grains"),
    ("IC", "Ice crystals"),
    ("PL", "Ice pellets"),
    ("GR", "Hail"),
    ("GS", "Small hail / snow pellets"),
    ("UP", "Unknown precipitation"),
    ("BR", "Mist"),
    ("FG", "Fog"),
    ("FU", "Smoke"),
    ("VA", "Volcanic ash"),
    ("DU", "Widespread dust"),
    ("SA", "Sand"),
    ("HZ", "Haze"),
    ("PY", "Spray"),
    ("PO", "Dust/sand whirls"),
    ("SQ", "Squall"),
    ("FC", "Funnel cloud"),
    ("SS", "Sandstorm"),
    ("DS", "Dust storm"),
];

fn lookup(table: &[(&str, &'static str)], code: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(candidate, _)| *candidate == code)
        .map(|(_, text)| *text)
}

impl WeatherGroup {
    pub fn parse(token: &str) -> Option<Self> {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| {
            Regex::new(
                r"^(\+|-|VC)?(MI|BC|PR|DR|BL|SH|TS|FZ)?((?:DZ|RA|SN|SG|IC|PL|GR|GS|UP|BR|FG|FU|VA|DU|SA|HZ|PY|PO|SQ|FC|SS|DS)*)$",
            )
            .unwrap()
        });
        let caps = re.captures(token)?;
        let intensity = caps.get(1).map(|m| m.as_str());
        let descriptor = caps.get(2).map(|m| m.as_str());
        let phenomena = caps.get(3).map_or("", |m| m.as_str());
        if descriptor.is_none() && phenomena.is_empty() {
            return None;
        }

        let description = if token == "+FC" {
            "Tornado / water spout".to_string()
        } else {
            let mut words: Vec<&str> = Vec::new();
            match intensity {
                Some("-") => words.push("Light"),
                Some("+") => words.push("Heavy"),
                Some(_) => words.push("In the vicinity:"),
                None => {}
            }
            if let Some(text) = descriptor.and_then(|code| lookup(DESCRIPTORS, code)) {
                words.push(text);
            }
            for start in (0..phenomena.len()).step_by(2) {
                if let Some(text) = phenomena
                    .get(start..start + 2)
                    .and_then(|code| lookup(PHENOMENA, code))
                {
                    words.push(text);
                }
            }
            words.join(" ")
        };

        Some(Self {
            code: token.to_string(),
            description,
        })
    }

    pub fn is_thunderstorm(&self) -> bool {
        self.code.contains("TS")
    }
}

/// `VVhhh` in hundreds of feet. `VV///` is a vertical visibility group
/// without a value.
fn parse_vertical_visibility(token: &str) -> Option<Option<u32>> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^VV(\d{3}|///)$").unwrap());
    let caps = re.captures(token)?;
    match &caps[1] {
        "///" => Some(None),
        hundreds => Some(Some(hundreds.parse::<u32>().ok()? * 100)),
    }
}

/// Wind, visibility, weather and cloud shared by a METAR body, a TAF's
/// initial conditions and each TAF change group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conditions {
    pub wind: Option<WindGroup>,
    pub variable_sector: Option<VariableSector>,
    pub visibility_m: Option<u32>,
    pub cavok: bool,
    pub weather: Vec<WeatherGroup>,
    pub clouds: Vec<CloudLayer>,
    pub vertical_visibility_ft: Option<u32>,
}

impl Conditions {
    /// Fold one token in. `false` means the token is not a condition group.
    pub fn absorb(&mut self, token: &str) -> bool {
        match token {
            "CAVOK" => {
                self.cavok = true;
                self.visibility_m = Some(UNLIMITED_VISIBILITY_M);
                return true;
            }
            "NSC" | "NCD" | "SKC" | "CLR" | "NSW" => return true,
            _ => {}
        }

        if self.wind.is_none() {
            if let Some(wind) = WindGroup::parse(token) {
                self.wind = Some(wind);
                return true;
            }
        }
        if let Some(sector) = VariableSector::parse(token) {
            self.variable_sector = Some(sector);
            return true;
        }
        if let Some(metres) = parse_visibility(token) {
            // Directional minimum visibility follows the prevailing one
            if self.visibility_m.is_none() {
                self.visibility_m = Some(metres);
            }
            return true;
        }
        if let Some(layer) = CloudLayer::parse(token) {
            self.clouds.push(layer);
            return true;
        }
        if let Some(vertical) = parse_vertical_visibility(token) {
            if vertical.is_some() {
                self.vertical_visibility_ft = vertical;
            }
            return true;
        }
        if let Some(weather) = WeatherGroup::parse(token) {
            self.weather.push(weather);
            return true;
        }
        false
    }

    /// Lowest reported cloud base, any cover.
    pub fn lowest_cloud_base_ft(&self) -> Option<u32> {
        self.clouds.iter().map(|layer| layer.height_ft).min()
    }

    /// Lowest broken or overcast layer, or the vertical visibility.
    pub fn ceiling_ft(&self) -> Option<u32> {
        self.clouds
            .iter()
            .filter(|layer| layer.cover.is_ceiling())
            .map(|layer| layer.height_ft)
            .chain(self.vertical_visibility_ft)
            .min()
    }

    pub fn has_thunderstorm(&self) -> bool {
        self.weather.iter().any(WeatherGroup::is_thunderstorm)
            || self
                .clouds
                .iter()
                .any(|layer| layer.convective.as_deref() == Some("CB"))
    }
}
