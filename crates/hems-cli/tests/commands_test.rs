//! End-to-end runs of the subcommands that need no network.

use clap::Parser;
use hems_cli::{commands, Cli, Config};

async fn run(args: &[&str]) -> anyhow::Result<String> {
    let cli = Cli::try_parse_from(std::iter::once("hemsreach").chain(args.iter().copied()))?;
    let mut out = Vec::new();
    commands::run(cli, &Config::default(), &mut out).await?;
    Ok(String::from_utf8(out)?)
}

#[tokio::test]
async fn reach_table_from_default_base() {
    let text = run(&["reach"]).await.unwrap();
    assert!(text.starts_with("Departure  Christoph 77 Mainz"));
    assert!(text.contains("Wind       calm at 5000 ft (manual)"));
    assert!(text.contains("219 kg trip fuel"));
    assert!(text.lines().any(|line| line.starts_with("EDDF ")));
    assert!(!text.contains("METAR"));
}

#[tokio::test]
async fn reach_json_carries_mission_report() {
    let text = run(&[
        "reach",
        "--airport",
        "eddf",
        "--wind-dir",
        "270",
        "--wind-speed",
        "25",
        "--json",
    ])
    .await
    .unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["departure"], "EDDF Frankfurt Airport");
    assert_eq!(json["wind_origin"]["source"], "manual");
    assert_eq!(json["wind"]["direction_deg"], 270.0);
    assert!(json.get("weather").is_none());

    let results = json["results"].as_array().unwrap();
    assert!(!results.is_empty());
    // Departure airport itself is at distance zero and comes first
    assert_eq!(results[0]["airport"]["icao"], "EDDF");
    let distances: Vec<f64> = results
        .iter()
        .map(|r| r["distance_nm"].as_f64().unwrap())
        .collect();
    assert!(distances.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[tokio::test]
async fn more_fuel_reaches_further() {
    let count = |text: String| -> usize {
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        json["results"].as_array().unwrap().len()
    };
    let light = count(run(&["reach", "--fuel", "350", "--json"]).await.unwrap());
    let heavy = count(run(&["reach", "--fuel", "700", "--json"]).await.unwrap());
    assert!(heavy > light);
}

#[tokio::test]
async fn insufficient_fuel_is_reported() {
    let err = run(&["reach", "--fuel", "150"]).await.unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("planning from Christoph 77 Mainz"));
    assert!(message.to_lowercase().contains("fuel"));
}

#[tokio::test]
async fn unknown_base_is_reported() {
    let err = run(&["reach", "--base", "Christoph 999"]).await.unwrap_err();
    assert!(format!("{err:#}").contains("Christoph 999"));
}

#[tokio::test]
async fn fuel_table_with_alternate() {
    let text = run(&["fuel", "--alternate", "80"]).await.unwrap();
    assert!(text.contains("alternate required"));
    assert!(text.contains("Alternate Fuel"));
    assert!(!text.contains("15 Minutes Fuel"));

    let json: serde_json::Value =
        serde_json::from_str(&run(&["fuel", "--json"]).await.unwrap()).unwrap();
    assert!((json["trip_fuel_kg"].as_f64().unwrap() - 218.7).abs() < 1e-9);
}

#[tokio::test]
async fn decode_both_products() {
    let text = run(&[
        "decode",
        "--metar",
        "METAR EDDH 181720Z AUTO 31008KT 4000 BR OVC006 12/11 Q1009=",
        "--taf",
        "TAF EDDH 181700Z 1818/1918 30010KT 6000 BKN008 BECMG 1820/1822 9999 SCT020=",
    ])
    .await
    .unwrap();
    assert!(text.contains("METAR EDDH observed day 18 17:20Z (automatic)"));
    assert!(text.contains("Ceiling     600 ft"));
    assert!(text.contains("TAF EDDH issued day 18 17:00Z, valid 1818/1918"));
    // Calendar dates depend on today, only their presence is fixed
    assert!(text.contains("  Observed    "));
    assert!(text.contains("  Valid       "));
    assert!(text.contains("  BECMG 1820/1822"));
}

#[tokio::test]
async fn decode_rejects_garbage() {
    let err = run(&["decode", "--metar", "hello"]).await.unwrap_err();
    assert!(format!("{err:#}").contains("decoding METAR"));
}

#[tokio::test]
async fn reference_listings() {
    let bases = run(&["bases"]).await.unwrap();
    assert!(bases.contains("Christoph 77 Mainz"));

    let json: serde_json::Value =
        serde_json::from_str(&run(&["airports", "--json"]).await.unwrap()).unwrap();
    assert!(json
        .as_array()
        .unwrap()
        .iter()
        .any(|airport| airport["icao"] == "EDDM"));
}
