//! Stub agency and saved page fixtures for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::http::{FetchError, PageFetcher, RetryPolicy};

pub const BASE_URL: &str = "http://bom.test";

/// Index page with the usual five letter groups.
pub const INDEX_PAGE_RANGES: &str = r#"<!DOCTYPE html>
<html>
<head><title>Daily Weather Observations</title></head>
<body>
  <div id="content">
    <h1>Tasmania Daily Weather Observations</h1>
    <p>Select the first letter of the location:</p>
    <ul class="alphabet">
      <li><a href="/climate/dwo/IDCJDW0700.A.shtml">A - E</a></li>
      <li><a href="/climate/dwo/IDCJDW0700.F.shtml">F - K</a></li>
      <li><a href="/climate/dwo/IDCJDW0700.L.shtml">L</a></li>
      <li><a href="/climate/dwo/IDCJDW0700.M.shtml">M - R</a></li>
      <li><a href="/climate/dwo/IDCJDW0700.S.shtml">S - Z</a></li>
    </ul>
    <p><a href="/climate/data/">Climate data online</a></p>
  </div>
</body>
</html>
"#;

/// Index page whose group boundaries are unlike any other state's.
pub const INDEX_PAGE_IRREGULAR: &str = r#"<html><body>
  <table>
    <tr>
      <td><a href="IDCJDW0700.A.shtml">A-C</a></td>
      <td><a href="IDCJDW0700.D.shtml">D-G</a></td>
      <td><a href="IDCJDW0700.H.shtml">H-K</a></td>
      <td><a href="IDCJDW0700.L.shtml">L-Z</a></td>
    </tr>
  </table>
</body></html>
"#;

/// Index page listing a single "L" group.
pub const INDEX_PAGE_SINGLE_L: &str = r#"<html><body>
  <a href="/climate/dwo/IDCJDW0700.L.shtml">L</a>
</body></html>
"#;

/// Station list of the "L" group.
pub const LETTER_L_PAGE: &str = r#"<!DOCTYPE html>
<html>
<body>
  <h2>Locations beginning with L</h2>
  <ul>
    <li><a href="/climate/dwo/IDCJDW7025.latest.shtml">Launceston Airport</a></li>
    <li><a href="/climate/dwo/IDCJDW7048.latest.shtml">Launceston (Ti Tree Bend)</a></li>
    <li><a href="/climate/dwo/IDCJDW7031.latest.shtml">Liawenee</a></li>
    <li><a href="/climate/dwo/IDCJDW7033.latest.shtml">Low
        Head</a></li>
    <li><a href="/climate/dwo/IDCJDW0700.shtml">Back to Tasmania</a></li>
  </ul>
</body>
</html>
"#;

/// Station list of the "M - R" group in South Australia.
pub const LETTER_M_PAGE: &str = r#"<html><body>
  <a href="/climate/dwo/IDCJDW5041.latest.shtml">Marree</a>
  <a href="/climate/dwo/IDCJDW5047.latest.shtml">Mount Gambier</a>
  <a href="/climate/dwo/IDCJDW5048.latest.shtml">Mount Lofty</a>
  <a href="/climate/dwo/IDCJDW5060.latest.shtml">Renmark</a>
</body></html>
"#;

/// January 2025 observations at IDCJDW7025, days 1 to 4.
pub const CSV_202501: &str = "\"Daily Weather Observations for Launceston, Tasmania for January 2025\"
\"Prepared at 13:00 UTC on 3 February 2025\"
\"IDCJDW7025.202501\"
\"\"
\"Observations were drawn from Launceston Airport {station 091311}\"
\"\"
,\"Date\",\"Minimum temperature (°C)\",\"Maximum temperature (°C)\",\"Rainfall (mm)\",\"Evaporation (mm)\",\"Sunshine (hours)\",\"Direction of maximum wind gust \",\"Speed of maximum wind gust (km/h)\",\"Time of maximum wind gust\",\"9am Temperature (°C)\",\"9am relative humidity (%)\",\"9am cloud amount (oktas)\",\"9am wind direction\",\"9am wind speed (km/h)\",\"9am MSL pressure (hPa)\",\"3pm Temperature (°C)\",\"3pm relative humidity (%)\",\"3pm cloud amount (oktas)\",\"3pm wind direction\",\"3pm wind speed (km/h)\",\"3pm MSL pressure (hPa)\"
,2025-01-01,10.2,24.5,0,,,NW,41,14:20,15.1,72,,CALM,,1015.2,22.8,45,,NNW,20,1012.0
,2025-01-02,11.8,27.3,0,,,NNW,48,13:05,17.4,64,,SE,4,1011.9,25.9,38,,NW,24,1008.4
,2025-01-03,9.4,19.6,3.2,,,W,56,16:40,12.9,88,,W,9,1006.1,18.0,60,,WSW,30,1007.7
,2025-01-04,7.9,18.2,0.4,,,SW,39,11:15,11.6,81,,SSW,7,1014.8,17.1,55,,SW,17,1016.3
\"Totals:\",,,3.6,,,,,,,,,,,,,,,,,,
";

/// February 2025 observations at IDCJDW7025, days 1 and 2, unpadded dates.
pub const CSV_202502: &str = "\"Daily Weather Observations for Launceston, Tasmania for February 2025\"
\"\"
,\"Date\",\"Minimum temperature (°C)\",\"Maximum temperature (°C)\",\"Rainfall (mm)\"
,2025-2-1,12.0,25.1,0
,2025-2-2,13.4,28.0,0.2
";

/// Canned response for one URL.
#[derive(Debug, Clone)]
enum Reply {
    Page(String),
    Status(u16),
}

/// In-memory stand-in for the agency website.
///
/// Serves registered pages, answers registered status codes as the real
/// client would classify them, and 404s everything else. Every fetch is
/// recorded.
#[derive(Debug, Default)]
pub struct StubAgency {
    replies: HashMap<String, Reply>,
    requests: Mutex<Vec<String>>,
}

impl StubAgency {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&mut self, url: impl Into<String>, body: impl Into<String>) -> &mut Self {
        self.replies.insert(url.into(), Reply::Page(body.into()));
        self
    }

    pub fn status(&mut self, url: impl Into<String>, status: u16) -> &mut Self {
        self.replies.insert(url.into(), Reply::Status(status));
        self
    }

    /// URLs fetched so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// A Tasmanian agency with the "L" group, its stations, and the
    /// January and February 2025 CSVs of IDCJDW7025.
    pub fn tasmania() -> Self {
        let mut agency = Self::new();
        agency
            .page(
                format!("{BASE_URL}/climate/dwo/IDCJDW0700.shtml"),
                INDEX_PAGE_RANGES,
            )
            .page(
                format!("{BASE_URL}/climate/dwo/IDCJDW0700.L.shtml"),
                LETTER_L_PAGE,
            )
            .page(
                format!("{BASE_URL}/climate/dwo/202501/text/IDCJDW7025.202501.csv"),
                CSV_202501,
            )
            .page(
                format!("{BASE_URL}/climate/dwo/202502/text/IDCJDW7025.202502.csv"),
                CSV_202502,
            );
        agency
    }
}

impl PageFetcher for StubAgency {
    async fn fetch(&self, url: &str, _policy: &RetryPolicy) -> Result<String, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        let url = url.to_string();
        match self.replies.get(&url) {
            Some(Reply::Page(body)) => Ok(body.clone()),
            Some(Reply::Status(403)) => Err(FetchError::Blocked { url }),
            Some(Reply::Status(429)) => Err(FetchError::RateLimited { url }),
            Some(Reply::Status(status)) => Err(FetchError::HttpStatus {
                url,
                status: *status,
            }),
            None => Err(FetchError::HttpStatus { url, status: 404 }),
        }
    }
}
