//! Telemetry snapshot model, baseline defaults and merge rules
//!
//! The endpoint serves a loose JSON object that may carry any subset of the
//! snapshot fields, with the original mixed camelCase/snake_case wire names.
//! A partial response is merged over the hardcoded baseline field by field;
//! nested objects (`turbines`, `transformer`) are replaced wholesale when
//! present, matching the shallow merge the endpoint consumers rely on.

use serde::{Deserialize, Serialize};

/// Subsystem state string reported as "Operational" when healthy
pub const STATE_OPERATIONAL: &str = "Operational";
/// Subsystem state string for a blacked-out subsystem
pub const STATE_BLACKOUT: &str = "Complete Blackout";

/// Output reading for a single turbine, in MW
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurbineReading {
    pub output: f64,
}

/// Voltage and current on both sides of the farm transformer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformerReading {
    pub pre_voltage: f64,
    pub pre_current: f64,
    pub post_voltage: f64,
    pub post_current: f64,
}

/// One complete telemetry reading. Ephemeral: replaced wholesale on every
/// poll cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    #[serde(rename = "windSpeed")]
    pub wind_speed: f64,
    #[serde(rename = "windDirection")]
    pub wind_direction: f64,
    pub turbines: Vec<TurbineReading>,
    pub transformer: TransformerReading,
    #[serde(rename = "totalGeneration")]
    pub total_generation: f64,
    pub substation_state: Option<String>,
    pub research_state: Option<String>,
    pub data_center_state: Option<String>,
    pub residential_state: Option<String>,
    pub dc_battery_state: Option<String>,
    pub dc_battery_charge: Option<f64>,
    pub turbine1_state: Option<bool>,
    pub turbine2_state: Option<bool>,
    pub turbine3_state: Option<bool>,
    pub turbine4_state: Option<bool>,
    /// Simulation clock value reported by the endpoint
    pub time: Option<u64>,
}

/// A partial telemetry response: any subset of the snapshot fields
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TelemetryUpdate {
    #[serde(rename = "windSpeed")]
    pub wind_speed: Option<f64>,
    #[serde(rename = "windDirection")]
    pub wind_direction: Option<f64>,
    pub turbines: Option<Vec<TurbineReading>>,
    pub transformer: Option<TransformerReading>,
    #[serde(rename = "totalGeneration")]
    pub total_generation: Option<f64>,
    pub substation_state: Option<String>,
    pub research_state: Option<String>,
    pub data_center_state: Option<String>,
    pub residential_state: Option<String>,
    pub dc_battery_state: Option<String>,
    pub dc_battery_charge: Option<f64>,
    pub turbine1_state: Option<bool>,
    pub turbine2_state: Option<bool>,
    pub turbine3_state: Option<bool>,
    pub turbine4_state: Option<bool>,
    pub time: Option<u64>,
}

impl TelemetrySnapshot {
    /// Hardcoded default values used to fill gaps in a partial response.
    /// Subsystem states are not part of the baseline; they stay unknown
    /// unless the endpoint reports them.
    pub fn baseline() -> Self {
        Self {
            wind_speed: 15.0,
            wind_direction: 53.0,
            turbines: vec![
                TurbineReading { output: 1.15 },
                TurbineReading { output: 1.03 },
                TurbineReading { output: 0.95 },
                TurbineReading { output: 0.93 },
            ],
            transformer: TransformerReading {
                pre_voltage: 690.00,
                pre_current: 5.95,
                post_voltage: 34000.00,
                post_current: 0.12,
            },
            total_generation: 4.10,
            substation_state: None,
            research_state: None,
            data_center_state: None,
            residential_state: None,
            dc_battery_state: None,
            dc_battery_charge: None,
            turbine1_state: None,
            turbine2_state: None,
            turbine3_state: None,
            turbine4_state: None,
            time: None,
        }
    }

    /// Static snapshot substituted wholesale when a fetch fails: baseline
    /// readings plus an explicit blacked-out scenario for the downstream
    /// subsystems. Does not reflect any real device state.
    pub fn blackout_fallback() -> Self {
        Self {
            substation_state: Some(STATE_OPERATIONAL.to_string()),
            research_state: Some(STATE_BLACKOUT.to_string()),
            data_center_state: Some(STATE_BLACKOUT.to_string()),
            residential_state: Some(STATE_OPERATIONAL.to_string()),
            dc_battery_state: Some("Empty".to_string()),
            dc_battery_charge: Some(-5.0),
            turbine1_state: Some(true),
            turbine2_state: Some(true),
            turbine3_state: Some(true),
            turbine4_state: Some(true),
            time: Some(1640),
            ..Self::baseline()
        }
    }

    /// Merge a partial response over this snapshot: fields present in the
    /// update win, absent fields keep their current value.
    pub fn merged(mut self, update: TelemetryUpdate) -> Self {
        if let Some(v) = update.wind_speed {
            self.wind_speed = v;
        }
        if let Some(v) = update.wind_direction {
            self.wind_direction = v;
        }
        if let Some(v) = update.turbines {
            self.turbines = v;
        }
        if let Some(v) = update.transformer {
            self.transformer = v;
        }
        if let Some(v) = update.total_generation {
            self.total_generation = v;
        }
        if update.substation_state.is_some() {
            self.substation_state = update.substation_state;
        }
        if update.research_state.is_some() {
            self.research_state = update.research_state;
        }
        if update.data_center_state.is_some() {
            self.data_center_state = update.data_center_state;
        }
        if update.residential_state.is_some() {
            self.residential_state = update.residential_state;
        }
        if update.dc_battery_state.is_some() {
            self.dc_battery_state = update.dc_battery_state;
        }
        if update.dc_battery_charge.is_some() {
            self.dc_battery_charge = update.dc_battery_charge;
        }
        if update.turbine1_state.is_some() {
            self.turbine1_state = update.turbine1_state;
        }
        if update.turbine2_state.is_some() {
            self.turbine2_state = update.turbine2_state;
        }
        if update.turbine3_state.is_some() {
            self.turbine3_state = update.turbine3_state;
        }
        if update.turbine4_state.is_some() {
            self.turbine4_state = update.turbine4_state;
        }
        if update.time.is_some() {
            self.time = update.time;
        }
        self
    }

    /// Per-turbine up/down flag by 1-based turbine number
    pub fn turbine_state(&self, number: usize) -> Option<bool> {
        match number {
            1 => self.turbine1_state,
            2 => self.turbine2_state,
            3 => self.turbine3_state,
            4 => self.turbine4_state,
            _ => None,
        }
    }
}

/// True when a subsystem state string reports "Operational"
pub fn is_operational(state: &Option<String>) -> bool {
    state.as_deref() == Some(STATE_OPERATIONAL)
}
