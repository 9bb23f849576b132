mod chart;
mod tooth;

pub use chart::{
    ChartType, OdontogramChart, QuadrantLayout, ToothEdit, ToothRecord, ToothUpsertRequest,
};
pub use tooth::{Quadrant, ToothCondition, ToothEditError, ToothNumber};
