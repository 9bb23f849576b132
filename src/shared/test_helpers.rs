use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use axum::Router;
use serde_json::Value;

use crate::core::middleware::credential_middleware;
use crate::features::auth::Credential;
use crate::modules::case_api::wire::{RawRef, RawTimestamp, RawTooth, RawToothCondition};
use crate::modules::case_api::{
    CaseApi, CaseApiError, CreateReportRequest, RawOdontogram, RawReport, ToothUpsertBody,
};

type Canned<T> = Result<T, CaseApiError>;

/// In-memory case API with canned responses.
///
/// Tooth upserts are applied to the stored chart so reloads see them.
pub struct FakeCaseApi {
    evidence: Canned<Vec<RawReport>>,
    dental: Canned<Vec<RawReport>>,
    final_reports: Canned<Vec<RawReport>>,
    odontogram: Mutex<Canned<RawOdontogram>>,
    upsert_error: Option<CaseApiError>,
    create_error: Option<CaseApiError>,
    evidence_fetches: AtomicUsize,
    upserts: Mutex<Vec<(String, u8, ToothUpsertBody)>>,
    created: Mutex<Vec<CreateReportRequest>>,
}

fn reports(value: Value) -> Vec<RawReport> {
    serde_json::from_value(value).expect("canned reports must deserialize")
}

impl FakeCaseApi {
    /// Empty report sources and no stored odontogram
    pub fn new() -> Self {
        Self {
            evidence: Ok(Vec::new()),
            dental: Ok(Vec::new()),
            final_reports: Ok(Vec::new()),
            odontogram: Mutex::new(Err(CaseApiError::NotFound(
                "/api/vitimas/v1/odontograma".to_string(),
            ))),
            upsert_error: None,
            create_error: None,
            evidence_fetches: AtomicUsize::new(0),
            upserts: Mutex::new(Vec::new()),
            created: Mutex::new(Vec::new()),
        }
    }

    pub fn with_evidence(mut self, value: Value) -> Self {
        self.evidence = Ok(reports(value));
        self
    }

    pub fn with_evidence_error(mut self, err: CaseApiError) -> Self {
        self.evidence = Err(err);
        self
    }

    pub fn with_dental(mut self, value: Value) -> Self {
        self.dental = Ok(reports(value));
        self
    }

    pub fn with_dental_error(mut self, err: CaseApiError) -> Self {
        self.dental = Err(err);
        self
    }

    /// Accepts the single-document shape the endpoint returns
    pub fn with_final_report(mut self, value: Value) -> Self {
        self.final_reports = Ok(vec![
            serde_json::from_value(value).expect("canned report must deserialize")
        ]);
        self
    }

    pub fn with_final_report_error(mut self, err: CaseApiError) -> Self {
        self.final_reports = Err(err);
        self
    }

    pub fn with_odontogram(self, value: Value) -> Self {
        let chart = serde_json::from_value(value).expect("canned odontogram must deserialize");
        *self.odontogram.lock().unwrap() = Ok(chart);
        self
    }

    pub fn with_odontogram_error(self, err: CaseApiError) -> Self {
        *self.odontogram.lock().unwrap() = Err(err);
        self
    }

    pub fn with_upsert_error(mut self, err: CaseApiError) -> Self {
        self.upsert_error = Some(err);
        self
    }

    pub fn with_create_error(mut self, err: CaseApiError) -> Self {
        self.create_error = Some(err);
        self
    }

    pub fn evidence_fetches(&self) -> usize {
        self.evidence_fetches.load(Ordering::SeqCst)
    }

    pub fn upserts(&self) -> Vec<(String, u8, ToothUpsertBody)> {
        self.upserts.lock().unwrap().clone()
    }

    pub fn created_requests(&self) -> Vec<CreateReportRequest> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl CaseApi for FakeCaseApi {
    async fn list_evidence_laudos(
        &self,
        _credential: &Credential,
        _case_id: &str,
    ) -> Result<Vec<RawReport>, CaseApiError> {
        self.evidence_fetches.fetch_add(1, Ordering::SeqCst);
        self.evidence.clone()
    }

    async fn list_dental_laudos(
        &self,
        _credential: &Credential,
        _case_id: &str,
    ) -> Result<Vec<RawReport>, CaseApiError> {
        self.dental.clone()
    }

    async fn get_final_reports(
        &self,
        _credential: &Credential,
        _case_id: &str,
    ) -> Result<Vec<RawReport>, CaseApiError> {
        self.final_reports.clone()
    }

    async fn get_odontogram(
        &self,
        _credential: &Credential,
        _victim_id: &str,
    ) -> Result<RawOdontogram, CaseApiError> {
        self.odontogram.lock().unwrap().clone()
    }

    async fn create_report(
        &self,
        _credential: &Credential,
        request: &CreateReportRequest,
    ) -> Result<RawReport, CaseApiError> {
        if let Some(err) = &self.create_error {
            return Err(err.clone());
        }
        self.created.lock().unwrap().push(request.clone());

        let mut raw = RawReport {
            id: Some("created-1".to_string()),
            created_at: Some(RawTimestamp::Text("2024-06-01T12:00:00Z".to_string())),
            ..RawReport::default()
        };
        match request {
            CreateReportRequest::EvidenceLaudo {
                case_id,
                evidence_ids,
                text,
            } => {
                raw.caso = Some(RawRef::Id(case_id.clone()));
                raw.evidencias = Some(
                    evidence_ids
                        .iter()
                        .cloned()
                        .map(|id| Some(RawRef::Id(id)))
                        .collect(),
                );
                raw.texto = Some(text.clone());
            }
            CreateReportRequest::DentalLaudo {
                victim_id,
                notes,
                opinion,
            } => {
                raw.vitima = Some(RawRef::Id(victim_id.clone()));
                raw.observacoes = Some(notes.clone());
                raw.parecer = Some(opinion.clone());
            }
            CreateReportRequest::FinalReport {
                case_id,
                title,
                text,
            } => {
                raw.caso = Some(RawRef::Id(case_id.clone()));
                raw.titulo = Some(title.clone());
                raw.texto = Some(text.clone());
            }
        }
        Ok(raw)
    }

    async fn upsert_tooth(
        &self,
        _credential: &Credential,
        victim_id: &str,
        number: u8,
        body: &ToothUpsertBody,
    ) -> Result<(), CaseApiError> {
        if let Some(err) = &self.upsert_error {
            return Err(err.clone());
        }
        self.upserts
            .lock()
            .unwrap()
            .push((victim_id.to_string(), number, body.clone()));

        let mut stored = self.odontogram.lock().unwrap();
        let mut chart = match &*stored {
            Ok(chart) => chart.clone(),
            Err(_) => RawOdontogram {
                tipo_odontograma: Some("adulto".to_string()),
                ..RawOdontogram::default()
            },
        };

        let tooth = RawTooth {
            numero: i64::from(number),
            condicoes: Some(
                body.condicao
                    .iter()
                    .map(|c| RawToothCondition {
                        tipo: c.tipo.clone(),
                        faces: Some(c.faces.clone()),
                    })
                    .collect(),
            ),
            observacoes: Some(body.observacoes.clone()),
        };
        let arch = if number < 30 {
            &mut chart.arcada_superior
        } else {
            &mut chart.arcada_inferior
        };
        let teeth = arch.get_or_insert_with(Vec::new);
        teeth.retain(|t| t.numero != i64::from(number));
        teeth.push(tooth);

        *stored = Ok(chart);
        Ok(())
    }
}

/// Apply the production bearer middleware to a router under test
pub fn with_bearer_auth(router: Router) -> Router {
    router.route_layer(axum::middleware::from_fn(credential_middleware))
}
