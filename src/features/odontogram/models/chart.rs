use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::tooth::{Quadrant, ToothCondition, ToothEditError, ToothNumber, BLANK_TOOTH_COLOR};
use crate::modules::case_api::wire::ToothConditionBody;
use crate::modules::case_api::{RawOdontogram, ToothUpsertBody};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    #[default]
    Adult,
    Child,
}

impl ChartType {
    /// Upstream `tipoOdontograma`; anything unrecognized is treated as adult
    fn from_wire_tag(tag: Option<&str>) -> Self {
        match tag {
            None | Some("adulto") => ChartType::Adult,
            Some("infantil") => ChartType::Child,
            Some(other) => {
                tracing::warn!("Unknown odontogram type '{}', using adult chart", other);
                ChartType::Adult
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToothRecord {
    pub number: ToothNumber,
    pub conditions: BTreeSet<ToothCondition>,
    pub notes: String,
    /// Surfaces recorded upstream per condition; not editable here
    pub faces: BTreeMap<ToothCondition, Vec<String>>,
}

impl ToothRecord {
    pub fn blank(number: ToothNumber) -> Self {
        Self {
            number,
            conditions: BTreeSet::new(),
            notes: String::new(),
            faces: BTreeMap::new(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.conditions.is_empty() && self.notes.is_empty()
    }

    pub fn has_notes(&self) -> bool {
        !self.notes.trim().is_empty()
    }

    /// Color of the highest-priority condition
    pub fn display_color(&self) -> &'static str {
        self.conditions
            .first()
            .map(|c| c.color())
            .unwrap_or(BLANK_TOOTH_COLOR)
    }
}

/// A requested change to one tooth, as typed by the examiner
#[derive(Debug, Clone, PartialEq)]
pub struct ToothEdit {
    pub number: u8,
    pub conditions: Vec<String>,
    pub notes: String,
}

impl ToothEdit {
    /// The record this edit would store; duplicate tags collapse
    pub fn validate(&self) -> Result<ToothRecord, ToothEditError> {
        let number = ToothNumber::try_from(self.number)?;
        let conditions = self
            .conditions
            .iter()
            .map(|tag| ToothCondition::from_tag(tag))
            .collect::<Result<BTreeSet<_>, _>>()?;

        Ok(ToothRecord {
            number,
            conditions,
            notes: self.notes.clone(),
            faces: BTreeMap::new(),
        })
    }
}

/// Remote mutation equivalent to an applied edit
#[derive(Debug, Clone, PartialEq)]
pub struct ToothUpsertRequest {
    pub number: ToothNumber,
    pub conditions: BTreeSet<ToothCondition>,
    pub present: bool,
    pub notes: String,
    pub faces: BTreeMap<ToothCondition, Vec<String>>,
}

impl ToothUpsertRequest {
    pub fn body(&self) -> ToothUpsertBody {
        ToothUpsertBody {
            condicao: self
                .conditions
                .iter()
                .map(|c| ToothConditionBody {
                    tipo: c.wire_tag().to_string(),
                    faces: self.faces.get(c).cloned().unwrap_or_default(),
                })
                .collect(),
            observacoes: self.notes.clone(),
            presente: self.present,
        }
    }
}

/// Eight teeth of one quadrant, blanks filled in
#[derive(Debug, Clone, PartialEq)]
pub struct QuadrantLayout {
    pub quadrant: Quadrant,
    pub teeth: Vec<ToothRecord>,
}

/// Dental chart of one victim. Only edited teeth have entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OdontogramChart {
    pub chart_type: ChartType,
    pub general_notes: String,
    pub teeth: BTreeMap<ToothNumber, ToothRecord>,
}

impl OdontogramChart {
    /// Stored record for a tooth, or a blank one
    pub fn tooth(&self, number: ToothNumber) -> ToothRecord {
        self.teeth
            .get(&number)
            .cloned()
            .unwrap_or_else(|| ToothRecord::blank(number))
    }

    /// Copy of this chart with one tooth replaced wholesale
    pub fn with_record(&self, record: ToothRecord) -> Self {
        let mut chart = self.clone();
        chart.teeth.insert(record.number, record);
        chart
    }

    /// Validate and apply an edit, returning the new chart and the matching
    /// upsert. The previous record of the tooth is replaced, never merged;
    /// only the surfaces of conditions that are kept carry over.
    pub fn apply_edit(
        &self,
        edit: &ToothEdit,
    ) -> Result<(OdontogramChart, ToothUpsertRequest), ToothEditError> {
        let mut record = edit.validate()?;
        record.faces = self
            .tooth(record.number)
            .faces
            .into_iter()
            .filter(|(condition, _)| record.conditions.contains(condition))
            .collect();

        let request = ToothUpsertRequest {
            number: record.number,
            present: !record.conditions.is_empty(),
            conditions: record.conditions.clone(),
            notes: record.notes.clone(),
            faces: record.faces.clone(),
        };

        Ok((self.with_record(record), request))
    }

    pub fn render(&self) -> Vec<QuadrantLayout> {
        Quadrant::ALL
            .into_iter()
            .map(|quadrant| QuadrantLayout {
                quadrant,
                teeth: quadrant.teeth().into_iter().map(|n| self.tooth(n)).collect(),
            })
            .collect()
    }
}

impl TryFrom<RawOdontogram> for OdontogramChart {
    type Error = ToothEditError;

    fn try_from(raw: RawOdontogram) -> Result<Self, Self::Error> {
        let mut teeth: BTreeMap<ToothNumber, ToothRecord> = BTreeMap::new();
        for tooth in raw.teeth() {
            let number = ToothNumber::try_from(tooth.numero)?;
            let Entry::Vacant(slot) = teeth.entry(number) else {
                tracing::warn!("Ignoring duplicate entry for tooth {} in stored chart", number);
                continue;
            };

            let mut conditions = BTreeSet::new();
            let mut faces = BTreeMap::new();
            for raw_condition in tooth.condicoes.iter().flatten() {
                let Some(condition) = ToothCondition::from_wire_tag(&raw_condition.tipo) else {
                    tracing::warn!(
                        "Dropping unknown condition '{}' on tooth {}",
                        raw_condition.tipo,
                        number
                    );
                    continue;
                };
                conditions.insert(condition);
                if let Some(surfaces) = raw_condition.faces.as_ref().filter(|f| !f.is_empty()) {
                    faces.entry(condition).or_insert_with(|| surfaces.clone());
                }
            }

            slot.insert(ToothRecord {
                number,
                conditions,
                notes: tooth.observacoes.clone().unwrap_or_default(),
                faces,
            });
        }

        Ok(Self {
            chart_type: ChartType::from_wire_tag(raw.tipo_odontograma.as_deref()),
            general_notes: raw.observacoes_gerais.unwrap_or_default(),
            teeth,
        })
    }
}
