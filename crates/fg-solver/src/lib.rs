//! Operating-point and speed solvers for a fan working against a duct.
//!
//! The operating point is found by a dense grid search rather than a root
//! finder: the clipped power-law fan curve has no guaranteed unique analytic
//! crossing, and the nearest-sample answer is robust to shape changes. The
//! speed solver bisects on speed, relying on operating airflow increasing
//! monotonically with speed at fixed resistance.
//!
//! Neither solver fails: unreachable targets clamp to the speed bounds and
//! degenerate inputs (zero speed) collapse to zero flow.

pub mod operating;
pub mod speed;

pub use operating::{
    DEFAULT_GRID_POINTS, OperatingPoint, OperatingPointConfig, find_operating_airflow,
    find_operating_point,
};
pub use speed::{
    DEFAULT_MAX_ITERATIONS, SpeedSolution, SpeedSolverConfig, SpeedStatus, find_speed_for_target,
};
