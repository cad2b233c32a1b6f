//! Adapters against a local file server standing in for AVWX and the DWD
//! open data mirror.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::Router;
use hems_core::reference::find_airport;
use hems_core::GeoPoint;
use hems_weather::{
    http, AvwxSource, Credentials, DwdOpmetSource, FallbackSource, FetchError, Product,
    WeatherSource, WindsAloftClient,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Fixed responses by path plus the `Authorization` header of every request.
#[derive(Clone, Default)]
struct Files {
    routes: Arc<HashMap<String, (StatusCode, String)>>,
    authorization: Arc<Mutex<Vec<Option<String>>>>,
}

impl Files {
    fn new(routes: &[(&str, StatusCode, &str)]) -> Self {
        Self {
            routes: Arc::new(
                routes
                    .iter()
                    .map(|(path, status, body)| (path.to_string(), (*status, body.to_string())))
                    .collect(),
            ),
            authorization: Arc::default(),
        }
    }

    fn authorization(&self) -> Vec<Option<String>> {
        self.authorization.lock().unwrap().clone()
    }
}

async fn serve_file(
    State(files): State<Files>,
    uri: Uri,
    headers: HeaderMap,
) -> (StatusCode, String) {
    let auth = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(String::from);
    files.authorization.lock().unwrap().push(auth);
    files
        .routes
        .get(uri.path())
        .cloned()
        .unwrap_or((StatusCode::NOT_FOUND, String::new()))
}

/// Serve `files` on an ephemeral port and return the base URL.
async fn spawn_server(files: Files) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().fallback(serve_file).with_state(files);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client() -> reqwest::Client {
    http::client(Duration::from_secs(5)).unwrap()
}

const EDDF_METAR_JSON: &str =
    r#"{"raw": "EDDF 181720Z 24012KT 9999 FEW040 18/09 Q1014 NOSIG", "station": "EDDF"}"#;
const EDDF_TAF_JSON: &str =
    r#"{"raw": "TAF EDDF 181700Z 1818/1924 24010KT 9999 SCT035 BECMG 1900/1903 VRB03KT"}"#;

#[tokio::test]
async fn avwx_reports_with_bearer_token() {
    let files = Files::new(&[
        ("/api/metar/EDDF", StatusCode::OK, EDDF_METAR_JSON),
        ("/api/taf/EDDF", StatusCode::OK, EDDF_TAF_JSON),
    ]);
    let base = spawn_server(files.clone()).await;
    let avwx = AvwxSource::new(client(), format!("{base}/"), Some("secret".into()));

    let metar = avwx.fetch_metar("eddf").await.unwrap();
    assert_eq!(metar.station, "EDDF");
    assert_eq!(metar.qnh_hpa, Some(1014));

    let taf = avwx.fetch_taf("EDDF").await.unwrap();
    assert_eq!(taf.changes.len(), 1);

    let auth = files.authorization();
    assert_eq!(auth.len(), 2);
    assert!(auth
        .iter()
        .all(|header| header.as_deref() == Some("Bearer secret")));
}

#[tokio::test]
async fn avwx_maps_empty_and_failed_responses() {
    let files = Files::new(&[
        ("/api/metar/EDDM", StatusCode::NO_CONTENT, ""),
        ("/api/metar/EDDH", StatusCode::INTERNAL_SERVER_ERROR, "boom"),
        ("/api/metar/EDDN", StatusCode::OK, r#"{"raw": "  "}"#),
        ("/api/metar/EDDK", StatusCode::OK, "<html>maintenance</html>"),
    ]);
    let base = spawn_server(files.clone()).await;
    let avwx = AvwxSource::new(client(), base, None);

    assert!(matches!(
        avwx.fetch_metar("EDDM").await,
        Err(FetchError::NotFound { ref icao, product: Product::Metar }) if icao == "EDDM"
    ));
    // Unknown path: the server answers 404
    assert!(matches!(
        avwx.fetch_taf("EDDM").await,
        Err(FetchError::NotFound { product: Product::Taf, .. })
    ));
    assert!(matches!(
        avwx.fetch_metar("EDDH").await,
        Err(FetchError::Status { ref url, status: 500 }) if url.ends_with("/api/metar/EDDH")
    ));
    assert!(matches!(
        avwx.fetch_metar("EDDN").await,
        Err(FetchError::NotFound { .. })
    ));
    assert!(matches!(
        avwx.fetch_metar("EDDK").await,
        Err(FetchError::Decode(_))
    ));

    // No token configured, no header sent
    assert!(files.authorization().iter().all(Option::is_none));
}

const OPMET_LISTING: &str = r#"<html><body><pre>
<a href="../">../</a>
<a href="SADL31_EDZW_181650_EDDF_-_20240618165000.txt">SADL31_EDZW_181650_EDDF_-_...</a>
<a href="SADL31_EDZW_181720_EDDF_-_20240618172000.txt">SADL31_EDZW_181720_EDDF_-_...</a>
<a href="SADL31_EDZW_181720_EDDM_-_20240618172000.txt">SADL31_EDZW_181720_EDDM_-_...</a>
</pre></body></html>"#;

fn opmet_files() -> Files {
    Files::new(&[
        ("/aviation/OPMET/METAR/DE/", StatusCode::OK, OPMET_LISTING),
        (
            "/aviation/OPMET/METAR/DE/SADL31_EDZW_181650_EDDF_-_20240618165000.txt",
            StatusCode::OK,
            "SADL31 EDZW 181650\r\nMETAR EDDF 181650Z 23010KT 9999 FEW040 18/09 Q1014=\r\n",
        ),
        (
            "/aviation/OPMET/METAR/DE/SADL31_EDZW_181720_EDDF_-_20240618172000.txt",
            StatusCode::OK,
            "SADL31 EDZW 181720\r\nMETAR EDDF 181720Z 24012KT\r\n 9999 FEW040 18/09 Q1014=\r\n",
        ),
    ])
}

#[tokio::test]
async fn dwd_picks_latest_bulletin_from_listing() {
    let files = opmet_files();
    let base = spawn_server(files.clone()).await;
    let credentials = Credentials::from_parts(Some("hems".into()), Some("pw".into()));
    let dwd = DwdOpmetSource::new(client(), base, credentials);

    let metar = dwd.fetch_metar("eddf").await.unwrap();
    assert_eq!(metar.observed.hour, 17);
    assert_eq!(metar.observed.minute, 20);
    assert_eq!(metar.conditions.wind.unwrap().speed_kt, 12);

    // Listing and file request both carry basic auth
    let auth = files.authorization();
    assert_eq!(auth.len(), 2);
    assert!(auth
        .iter()
        .all(|header| header.as_deref().is_some_and(|h| h.starts_with("Basic "))));
}

#[tokio::test]
async fn dwd_reports_missing_station_and_listing() {
    let base = spawn_server(opmet_files()).await;
    let dwd = DwdOpmetSource::new(client(), base, None);

    assert!(matches!(
        dwd.fetch_metar("EDDH").await,
        Err(FetchError::NotFound { ref icao, .. }) if icao == "EDDH"
    ));
    // Listed, but the file itself is gone
    assert!(matches!(
        dwd.fetch_metar("EDDM").await,
        Err(FetchError::Status { status: 404, .. })
    ));
    assert!(matches!(
        dwd.fetch_taf("EDDF").await,
        Err(FetchError::Status { ref url, status: 404 }) if url.ends_with("/aviation/OPMET/TAF/DE/")
    ));
}

#[tokio::test]
async fn fallback_uses_avwx_when_mirror_has_nothing() {
    let files = Files::new(&[
        ("/aviation/OPMET/METAR/DE/", StatusCode::OK, OPMET_LISTING),
        (
            "/api/metar/EDDH",
            StatusCode::OK,
            r#"{"raw": "EDDH 181720Z 31008KT 4000 BR OVC006 12/11 Q1009"}"#,
        ),
    ]);
    let base = spawn_server(files).await;
    let source = FallbackSource::new(
        DwdOpmetSource::new(client(), base.clone(), None),
        AvwxSource::new(client(), base, None),
    );

    let metar = source.fetch_metar("EDDH").await.unwrap();
    assert_eq!(metar.conditions.ceiling_ft(), Some(600));
    assert_eq!(source.name(), "dwd+avwx");
}

const FORECAST_ROOT: &str = "/aviation/ATM/AirportWxForecast/";

const STATION_LISTING: &str = r#"<html><body><pre>
<a href="../">../</a>
<a href="eddf/">eddf/</a>
<a href="eddh/">eddh/</a>
<a href="eddm/">eddm/</a>
</pre></body></html>"#;

const EDDM_LISTING: &str = r#"<pre>
<a href="airport_forecast_eddm_202406180000.csv">airport_forecast_eddm_202406180000.csv</a>
<a href="airport_forecast_eddm_202406180600.csv">airport_forecast_eddm_202406180600.csv</a>
</pre>"#;

const EDDM_FORECAST: &str = "Airport Weather Forecast EDDM\n\
    DATE;18.06.;18.06.;18.06.\n\
    UTC;12;13;14\n\
    5000FT;250/15;260/18;270/40\n\
    FZLVL;85;87;90\n";

fn mainz() -> GeoPoint {
    GeoPoint::new(50.0, 8.2711)
}

fn winds_client(base: &str) -> WindsAloftClient {
    let airports = ["EDDF", "EDDM", "EDDH"]
        .into_iter()
        .map(|icao| find_airport(icao).unwrap())
        .collect();
    WindsAloftClient::new(client(), base, None).with_airports(airports)
}

#[tokio::test]
async fn winds_aloft_skips_station_without_forecast() {
    let eddf_dir = format!("{FORECAST_ROOT}eddf/");
    let eddm_dir = format!("{FORECAST_ROOT}eddm/");
    let eddm_file = format!("{eddm_dir}airport_forecast_eddm_202406180600.csv");
    let files = Files::new(&[
        (FORECAST_ROOT, StatusCode::OK, STATION_LISTING),
        // Frankfurt is nearest but its directory is empty
        (eddf_dir.as_str(), StatusCode::OK, "<pre><a href=\"../\">../</a></pre>"),
        (eddm_dir.as_str(), StatusCode::OK, EDDM_LISTING),
        (eddm_file.as_str(), StatusCode::OK, EDDM_FORECAST),
    ]);
    let base = spawn_server(files).await;

    let (station, forecast) = winds_client(&base).fetch(&mainz()).await.unwrap();
    assert_eq!(station.icao, "EDDM");
    assert_eq!(forecast.icao, "EDDM");
    assert_eq!(forecast.hours_utc, [Some(12), Some(13), Some(14)]);

    let summary = forecast.summary(2);
    assert_eq!(summary.samples, 2);
    assert_eq!(summary.wind.unwrap().direction_deg, 255.0);
    assert_eq!(summary.freezing_level_ft, Some(8500));
}

#[tokio::test]
async fn winds_aloft_without_any_forecast_is_no_station() {
    let empty = "<pre></pre>";
    let dirs: Vec<String> = ["eddf", "eddh", "eddm"]
        .iter()
        .map(|station| format!("{FORECAST_ROOT}{station}/"))
        .collect();
    let mut routes = vec![(FORECAST_ROOT, StatusCode::OK, STATION_LISTING)];
    routes.extend(dirs.iter().map(|dir| (dir.as_str(), StatusCode::OK, empty)));
    let base = spawn_server(Files::new(&routes)).await;

    assert!(matches!(
        winds_client(&base).fetch(&mainz()).await,
        Err(FetchError::NoStation { .. })
    ));
}

#[tokio::test]
async fn winds_aloft_server_errors_are_not_skipped() {
    let eddf_dir = format!("{FORECAST_ROOT}eddf/");
    let files = Files::new(&[
        (FORECAST_ROOT, StatusCode::OK, STATION_LISTING),
        (eddf_dir.as_str(), StatusCode::SERVICE_UNAVAILABLE, ""),
    ]);
    let base = spawn_server(files).await;

    assert!(matches!(
        winds_client(&base).fetch(&mainz()).await,
        Err(FetchError::Status { status: 503, .. })
    ));
}
