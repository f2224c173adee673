// fg-core/src/units.rs
//
// The numerical core works on plain f64 in catalog units (cfm, Pa, rpm, W,
// s). These uom types are used at the reporting edge where values are shown
// in SI alongside the catalog units.

use uom::si::f64::{
    Energy as UomEnergy, Power as UomPower, Pressure as UomPressure, Time as UomTime,
    Volume as UomVolume, VolumeRate as UomVolumeRate,
};

// Public canonical unit types (SI, f64)
pub type Airflow = UomVolumeRate;
pub type Energy = UomEnergy;
pub type Power = UomPower;
pub type Pressure = UomPressure;
pub type Time = UomTime;
pub type Volume = UomVolume;

#[inline]
pub fn cfm(v: f64) -> Airflow {
    use uom::si::volume_rate::cubic_foot_per_minute;
    Airflow::new::<cubic_foot_per_minute>(v)
}

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn wh(v: f64) -> Energy {
    use uom::si::energy::watt_hour;
    Energy::new::<watt_hour>(v)
}

/// Air power delivered at an operating point: airflow × pressure rise.
#[inline]
pub fn air_power(q: Airflow, dp: Pressure) -> Power {
    q * dp
}

/// Power in watts.
#[inline]
pub fn to_watts(p: Power) -> f64 {
    use uom::si::power::watt;
    p.get::<watt>()
}

/// Airflow in litres per second.
#[inline]
pub fn to_l_per_s(q: Airflow) -> f64 {
    use uom::si::volume_rate::liter_per_second;
    q.get::<liter_per_second>()
}

/// Energy in kilowatt-hours.
#[inline]
pub fn to_kwh(e: Energy) -> f64 {
    use uom::si::energy::kilowatt_hour;
    e.get::<kilowatt_hour>()
}

/// Volume moved by a cfm·h integral, in cubic metres.
#[inline]
pub fn cfm_hours_to_m3(cfm_h: f64) -> f64 {
    use uom::si::time::hour;
    use uom::si::volume::cubic_meter;
    let volume: Volume = cfm(cfm_h) * Time::new::<hour>(1.0);
    volume.get::<cubic_meter>()
}
