//! Upstream JSON shapes.
//!
//! The upstream API speaks Portuguese field names and is loosely typed:
//! references may arrive as bare ids or populated documents, and timestamps
//! as ISO strings or epoch milliseconds. These types accept all of that and
//! leave interpretation to the features that consume them.

use serde::{Deserialize, Serialize};

/// A reference that is either a bare id or a populated document
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawRef<T> {
    Id(String),
    Populated(T),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Text(String),
    Millis(i64),
}

/// Populated user; ids are not consumed
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawUser {
    #[serde(alias = "nome")]
    pub name: Option<String>,
    #[serde(alias = "cargo")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawVictim {
    #[serde(rename = "_id")]
    pub object_id: Option<String>,
    pub id: Option<String>,
    #[serde(alias = "name")]
    pub nome: Option<String>,
    pub nic: Option<String>,
}

/// Populated case or evidence document; only the id is consumed
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawDocument {
    #[serde(rename = "_id")]
    pub object_id: Option<String>,
    pub id: Option<String>,
}

/// Documents serialized with virtuals carry both `_id` and `id`; `_id` wins
fn either_id<'a>(object_id: &'a Option<String>, id: &'a Option<String>) -> Option<&'a str> {
    object_id.as_deref().or(id.as_deref())
}

impl RawVictim {
    pub fn identifier(&self) -> Option<&str> {
        either_id(&self.object_id, &self.id)
    }
}

impl RawDocument {
    pub fn identifier(&self) -> Option<&str> {
        either_id(&self.object_id, &self.id)
    }
}

impl RawRef<RawDocument> {
    pub fn id(&self) -> Option<&str> {
        match self {
            RawRef::Id(id) => Some(id.as_str()),
            RawRef::Populated(doc) => doc.identifier(),
        }
    }
}

/// Evidence laudo, dental laudo or final report as returned upstream
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawReport {
    #[serde(rename = "_id")]
    pub object_id: Option<String>,
    pub id: Option<String>,
    #[serde(alias = "title")]
    pub titulo: Option<String>,
    #[serde(alias = "text")]
    pub texto: Option<String>,
    #[serde(alias = "notes")]
    pub observacoes: Option<String>,
    #[serde(alias = "opinion")]
    pub parecer: Option<String>,
    #[serde(rename = "criadoEm")]
    pub criado_em: Option<RawTimestamp>,
    #[serde(rename = "dataEmissao", alias = "issuedAt")]
    pub data_emissao: Option<RawTimestamp>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<RawTimestamp>,
    pub autor: Option<RawRef<RawUser>>,
    pub perito: Option<RawRef<RawUser>>,
    #[serde(rename = "criadoPor")]
    pub criado_por: Option<RawRef<RawUser>>,
    pub status: Option<String>,
    pub caso: Option<RawRef<RawDocument>>,
    pub vitima: Option<RawRef<RawVictim>>,
    /// Dangling references come back as `null` entries
    pub evidencias: Option<Vec<Option<RawRef<RawDocument>>>>,
}

impl RawReport {
    pub fn identifier(&self) -> Option<&str> {
        either_id(&self.object_id, &self.id)
    }

    pub fn evidence_ids(&self) -> impl Iterator<Item = &str> {
        self.evidencias.iter().flatten().flatten().filter_map(|e| e.id())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawOdontogram {
    #[serde(rename = "tipoOdontograma")]
    pub tipo_odontograma: Option<String>,
    #[serde(rename = "arcadaSuperior")]
    pub arcada_superior: Option<Vec<RawTooth>>,
    #[serde(rename = "arcadaInferior")]
    pub arcada_inferior: Option<Vec<RawTooth>>,
    #[serde(rename = "observacoesGerais")]
    pub observacoes_gerais: Option<String>,
}

impl RawOdontogram {
    /// Both arches, upper first
    pub fn teeth(&self) -> impl Iterator<Item = &RawTooth> {
        self.arcada_superior
            .iter()
            .flatten()
            .chain(self.arcada_inferior.iter().flatten())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawTooth {
    pub numero: i64,
    pub condicoes: Option<Vec<RawToothCondition>>,
    pub observacoes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawToothCondition {
    pub tipo: String,
    /// Tooth surfaces the condition affects (`"M"`, `"O"`, ...)
    pub faces: Option<Vec<String>>,
}

/// Body of `PUT /api/vitimas/{victimId}/odontograma/dente/{number}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToothUpsertBody {
    pub condicao: Vec<ToothConditionBody>,
    pub observacoes: String,
    pub presente: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToothConditionBody {
    pub tipo: String,
    pub faces: Vec<String>,
}

/// Report creation, one upstream endpoint per report kind
#[derive(Debug, Clone, PartialEq)]
pub enum CreateReportRequest {
    EvidenceLaudo {
        case_id: String,
        evidence_ids: Vec<String>,
        text: String,
    },
    DentalLaudo {
        victim_id: String,
        notes: String,
        opinion: String,
    },
    FinalReport {
        case_id: String,
        title: String,
        text: String,
    },
}

#[derive(Debug, Serialize)]
pub(super) struct EvidenceLaudoBody<'a> {
    pub caso: &'a str,
    pub evidencias: &'a [String],
    pub texto: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct DentalLaudoBody<'a> {
    pub observacoes: &'a str,
    pub parecer: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct FinalReportBody<'a> {
    pub titulo: &'a str,
    pub texto: &'a str,
}
