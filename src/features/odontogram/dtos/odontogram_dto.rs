use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::odontogram::models::{
    ChartType, OdontogramChart, Quadrant, QuadrantLayout, ToothCondition, ToothEdit, ToothRecord,
};
use crate::features::odontogram::services::ToothEditOutcome;

/// Response DTO for one tooth
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ToothRecordDto {
    pub number: u8,
    pub quadrant: Quadrant,
    pub conditions: Vec<ToothCondition>,
    pub notes: String,
    pub has_notes: bool,
    /// Color of the highest-priority condition, or the blank color
    pub color: String,
}

impl From<&ToothRecord> for ToothRecordDto {
    fn from(r: &ToothRecord) -> Self {
        Self {
            number: r.number.get(),
            quadrant: r.number.quadrant(),
            conditions: r.conditions.iter().copied().collect(),
            notes: r.notes.clone(),
            has_notes: r.has_notes(),
            color: r.display_color().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuadrantDto {
    pub quadrant: Quadrant,
    pub name: String,
    pub teeth: Vec<ToothRecordDto>,
}

impl From<QuadrantLayout> for QuadrantDto {
    fn from(q: QuadrantLayout) -> Self {
        Self {
            quadrant: q.quadrant,
            name: q.quadrant.name().to_string(),
            teeth: q.teeth.iter().map(ToothRecordDto::from).collect(),
        }
    }
}

/// Response DTO for a victim's chart
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OdontogramResponseDto {
    pub victim_id: String,
    pub chart_type: ChartType,
    pub general_notes: String,
    /// Teeth with a stored record
    pub teeth: Vec<ToothRecordDto>,
    /// Full 32-tooth layout in drawing order
    pub quadrants: Vec<QuadrantDto>,
}

impl OdontogramResponseDto {
    pub fn new(victim_id: &str, chart: &OdontogramChart) -> Self {
        Self {
            victim_id: victim_id.to_string(),
            chart_type: chart.chart_type,
            general_notes: chart.general_notes.clone(),
            teeth: chart.teeth.values().map(ToothRecordDto::from).collect(),
            quadrants: chart.render().into_iter().map(QuadrantDto::from).collect(),
        }
    }
}

/// Request DTO for replacing one tooth's record
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateToothDto {
    /// Full condition set; previous conditions are discarded
    #[serde(default)]
    pub conditions: Vec<String>,

    #[serde(default)]
    #[validate(length(max = 2000, message = "Notes must not exceed 2000 characters"))]
    pub notes: String,
}

impl UpdateToothDto {
    pub fn into_edit(self, number: u8) -> ToothEdit {
        ToothEdit {
            number,
            conditions: self.conditions,
            notes: self.notes,
        }
    }
}

/// Response DTO for a tooth edit
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ToothEditResponseDto {
    pub tooth: ToothRecordDto,
    pub chart: OdontogramResponseDto,
    /// False when the case API rejected or missed the change
    pub persisted: bool,
    pub warning: Option<String>,
}

impl ToothEditResponseDto {
    pub fn new(victim_id: &str, outcome: &ToothEditOutcome) -> Self {
        Self {
            tooth: ToothRecordDto::from(&outcome.record),
            chart: OdontogramResponseDto::new(victim_id, &outcome.chart),
            persisted: outcome.persisted,
            warning: outcome.warning.clone(),
        }
    }
}

/// Legend entry for a tooth condition
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConditionLegendDto {
    pub condition: ToothCondition,
    pub label: String,
    pub color: String,
}

impl From<ToothCondition> for ConditionLegendDto {
    fn from(condition: ToothCondition) -> Self {
        Self {
            condition,
            label: condition.label().to_string(),
            color: condition.color().to_string(),
        }
    }
}
