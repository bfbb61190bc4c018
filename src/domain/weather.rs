// Surface weather observations from the mishap brief
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherObservation {
    /// Local clock label, e.g. "19:55"
    pub time_local: String,
    /// Zulu label, empty when the brief only gives one time
    pub time_zulu: String,
    pub visibility_sm: Option<f64>,
    pub ceiling_ft: Option<f64>,
}
