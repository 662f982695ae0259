//! Handlers for the `/api/v1/underwriting` surface (`spec.md` §6).
//!
//! Each request that starts a workflow maps to one orchestrator run
//! with an attached subscriber: the synchronous endpoints attach the
//! `streaming::collector`, the streaming endpoint attaches
//! `streaming::sse`, and the WebSocket endpoint attaches
//! `streaming::websocket` — all three also attach a `streaming::persistence`
//! subscriber alongside, mirroring `spec.md` §4.J's "1:1 ... with an
//! attached subscriber".

use agent_runtime::{Orchestrator, OrchestratorConfig, OrchestratorError, WorkflowEvent};
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use core_kernel::WorkflowId;
use domain_underwriting::{Applicant, ExtractedMedical, UnderwritingReport};
use infra_store::{ComprehensiveReportDocument, DocumentType};
use serde_json::{json, Value};
use streaming::sse::{workflow_event_stream, TerminalFrame};
use streaming::websocket::{handle_socket, StartWorkflow, WorkflowHandle};
use streaming::WorkflowBus;
use tokio::sync::oneshot;

use crate::dto::underwriting::{
    pipeline_stage_descriptions, AgentDescription, ApplicationRequest, DashboardResponse,
    DashboardSummaryDto, ProcessFileRequest, ProcessResponse,
};
use crate::error::ApiError;
use crate::AppState;

/// "All versions" queries pass this as `limit`; large enough that no
/// real application ever has more comprehensive-report snapshots.
const ALL_VERSIONS_LIMIT: i64 = 10_000;

struct WorkflowLaunch {
    workflow_id: String,
    application_id: String,
    events_rx: tokio::sync::broadcast::Receiver<WorkflowEvent>,
    report_rx: oneshot::Receiver<Result<UnderwritingReport, OrchestratorError>>,
}

/// Spawns the orchestrator task plus a persistence subscriber for one
/// application, returning the event receiver and outcome handle for
/// whichever caller-side subscriber (collector/SSE/WebSocket) attaches
/// next. The orchestrator stays channel-agnostic (`spec.md` §4.G); this
/// function owns the `WorkflowBus` (`spec.md` §4.H "subscribers attach
/// before START").
fn launch_workflow(
    state: &AppState,
    applicant: Applicant,
    extracted: ExtractedMedical,
) -> WorkflowLaunch {
    let workflow_id = WorkflowId::new_v7().to_string();
    let application_id = applicant.application_id.to_string();
    let applicant_name = applicant.name.clone();

    let bus = WorkflowBus::new();
    let events_rx = bus.subscribe();
    let persistence_rx = bus.subscribe();
    let sender = bus.sender();
    drop(bus);

    tokio::spawn(streaming::persistence::run(
        persistence_rx,
        state.store.clone(),
        application_id.clone(),
        workflow_id.clone(),
        applicant_name,
    ));

    let orchestrator = Orchestrator::new(
        state.agent_runner.clone(),
        OrchestratorConfig {
            strict_premium_conformance: state.config.strict_premium_conformance,
            ..OrchestratorConfig::default()
        },
    );
    let store = state.store.clone();
    let (report_tx, report_rx) = oneshot::channel();
    let app_id_for_log = application_id.clone();

    tokio::spawn(async move {
        let result = orchestrator.run(applicant, extracted, &sender).await;
        drop(sender);

        if let Ok(report) = &result {
            let risk_category = format!("{:?}", report.loading_result.risk_category);
            let document = ComprehensiveReportDocument::from_report(report.clone(), risk_category);
            if let Err(err) = store.store_report(document).await {
                tracing::warn!(application_id = %app_id_for_log, error = %err, "failed to persist comprehensive report");
            }
        }

        let _ = report_tx.send(result);
    });

    WorkflowLaunch {
        workflow_id,
        application_id,
        events_rx,
        report_rx,
    }
}

async fn await_outcome(
    launch: WorkflowLaunch,
) -> Result<(String, String, Vec<WorkflowEvent>, UnderwritingReport), ApiError> {
    let events = streaming::collector::collect(launch.events_rx).await;
    let report = launch
        .report_rx
        .await
        .map_err(|_| ApiError::Internal("workflow task terminated unexpectedly".to_string()))??;
    Ok((launch.workflow_id, launch.application_id, events, report))
}

async fn run_to_completion(
    state: &AppState,
    applicant: Applicant,
    extracted: ExtractedMedical,
) -> Result<ProcessResponse, ApiError> {
    let launch = launch_workflow(state, applicant, extracted);
    let (workflow_id, application_id, events, report) = await_outcome(launch).await?;
    Ok(ProcessResponse {
        workflow_id,
        application_id,
        status: "completed".to_string(),
        events,
        report,
    })
}

/// `POST /process` (`spec.md` §6): collector subscriber.
pub async fn process(
    State(state): State<AppState>,
    Json(body): Json<ApplicationRequest>,
) -> Result<Json<ProcessResponse>, ApiError> {
    let (applicant, extracted) = body.into_domain()?;
    let response = run_to_completion(&state, applicant, extracted).await?;
    Ok(Json(response))
}

/// `POST /process/stream` (`spec.md` §6): one SSE `data:` frame per
/// `WorkflowEvent`, terminated by a `complete`/`error` frame.
pub async fn process_stream(
    State(state): State<AppState>,
    Json(body): Json<ApplicationRequest>,
) -> Result<Response, ApiError> {
    let (applicant, extracted) = body.into_domain()?;
    let launch = launch_workflow(&state, applicant, extracted);
    let workflow_id = launch.workflow_id.clone();
    let events_rx = launch.events_rx;
    let report_rx = launch.report_rx;

    let terminal = async move {
        match report_rx.await {
            Ok(Ok(_)) => TerminalFrame::Complete { workflow_id },
            Ok(Err(err)) => TerminalFrame::Error {
                workflow_id,
                message: err.to_string(),
            },
            Err(_) => TerminalFrame::Error {
                workflow_id,
                message: "workflow task terminated unexpectedly".to_string(),
            },
        }
    };

    Ok(workflow_event_stream(events_rx, terminal).into_response())
}

/// `POST /process/file` (`spec.md` §6): applicant/medical JSON read from
/// paths on the server's filesystem instead of the request body.
pub async fn process_file(
    State(state): State<AppState>,
    Json(body): Json<ProcessFileRequest>,
) -> Result<Json<ProcessResponse>, ApiError> {
    let applicant_text = tokio::fs::read_to_string(&body.applicant_path)
        .await
        .map_err(|e| ApiError::BadRequest(format!("reading {}: {e}", body.applicant_path)))?;
    let mut request: ApplicationRequest = serde_json::from_str(&applicant_text)
        .map_err(|e| ApiError::BadRequest(format!("parsing {}: {e}", body.applicant_path)))?;

    if let Some(medical_path) = &body.medical_path {
        let medical_text = tokio::fs::read_to_string(medical_path)
            .await
            .map_err(|e| ApiError::BadRequest(format!("reading {medical_path}: {e}")))?;
        let medical = serde_json::from_str(&medical_text)
            .map_err(|e| ApiError::BadRequest(format!("parsing {medical_path}: {e}")))?;
        request.medical_data = Some(medical);
    }

    let (applicant, extracted) = request.into_domain()?;
    let response = run_to_completion(&state, applicant, extracted).await?;
    Ok(Json(response))
}

/// `GET /agents` (`spec.md` §6): static list of the seven pipeline stages.
pub async fn agents() -> Json<Vec<AgentDescription>> {
    Json(pipeline_stage_descriptions())
}

/// `GET /sample-data` (`spec.md` §6): a canned request body matching
/// `spec.md` §8 scenario 1 (healthy young adult, full coverage).
pub async fn sample_data() -> Json<Value> {
    Json(sample_request_body())
}

/// `POST /demo` (`spec.md` §6): "equivalent to `/process` on the canned
/// body".
pub async fn demo(State(state): State<AppState>) -> Result<Json<ProcessResponse>, ApiError> {
    let body: ApplicationRequest = serde_json::from_value(sample_request_body())
        .expect("the canned sample body always deserializes");
    let (applicant, extracted) = body.into_domain()?;
    let response = run_to_completion(&state, applicant, extracted).await?;
    Ok(Json(response))
}

fn sample_request_body() -> Value {
    json!({
        "personalInfo": {
            "name": "Jordan Lee",
            "age": 28,
            "gender": "Male",
            "occupation": "Accountant",
            "income": { "annual": 1_500_000 }
        },
        "applicationDetails": {
            "applicationNumber": "APP-SAMPLE-001"
        },
        "insuranceCoverage": {
            "totalSumAssured": 5_000_000,
            "coversRequested": [
                { "coverType": "Term Life Insurance", "sumAssured": 5_000_000, "term": 20 }
            ]
        },
        "lifestyle": {
            "smoker": false,
            "alcoholUnitsPerWeek": 2,
            "exerciseFrequency": "regular"
        },
        "health": { "heightCm": 175, "weightKg": 70 },
        "medicalData": { "reports": [] }
    })
}

/// `GET /reports` (`spec.md` §6): all reports, one per application.
pub async fn list_reports(State(state): State<AppState>) -> Result<Json<Vec<Value>>, ApiError> {
    let reports = state.store.find_all_reports().await?;
    Ok(Json(reports))
}

/// `GET /reports/{appId}` (`spec.md` §6): most-recent report.
pub async fn get_report(
    State(state): State<AppState>,
    Path(application_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let mut docs = state
        .store
        .find_by_application(&application_id, DocumentType::ComprehensiveReport, 1)
        .await?;
    let report = docs
        .pop()
        .ok_or_else(|| ApiError::NotFound(application_id.clone()))?;
    Ok(Json(report))
}

/// `GET /reports/{appId}/all` (`spec.md` §6): all report versions.
pub async fn get_report_all(
    State(state): State<AppState>,
    Path(application_id): Path<String>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let docs = state
        .store
        .find_by_application(
            &application_id,
            DocumentType::ComprehensiveReport,
            ALL_VERSIONS_LIMIT,
        )
        .await?;
    Ok(Json(docs))
}

/// `GET /dashboard-data` (`spec.md` §6).
pub async fn dashboard_data(
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let applications = state.store.find_all_reports().await?;
    let summary = state.store.dashboard_summary().await?;
    Ok(Json(DashboardResponse {
        applications,
        summary: DashboardSummaryDto::from(summary),
    }))
}

/// `WS /ws/{clientId}` (`spec.md` §6): client sends `{action:"process",
/// data:{...}}` / `{action:"ping"}`; the server streams event JSON and a
/// final `{type:"workflow_complete"}`/`{type:"error",...}` frame. The
/// session stays open afterward for further `process` actions.
pub async fn websocket(
    ws: WebSocketUpgrade,
    Path(client_id): Path<String>,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| async move {
        let start_workflow: StartWorkflow = Box::new(move |data: Value| {
            let state = state.clone();
            Box::pin(async move {
                let request: ApplicationRequest =
                    serde_json::from_value(data).map_err(|e| e.to_string())?;
                let (applicant, extracted) = request.into_domain().map_err(|e| e.to_string())?;
                let launch = launch_workflow(&state, applicant, extracted);
                Ok(WorkflowHandle {
                    events: launch.events_rx,
                    outcome: to_unit_outcome(launch.report_rx),
                })
            })
        });
        handle_socket(socket, client_id, start_workflow).await;
    })
}

/// Adapts the orchestrator's typed outcome into the `Result<(), String>`
/// shape `streaming::websocket` expects, so that crate does not need to
/// depend on `domain_underwriting`/`agent_runtime` error types directly.
fn to_unit_outcome(
    report_rx: oneshot::Receiver<Result<UnderwritingReport, OrchestratorError>>,
) -> oneshot::Receiver<Result<(), String>> {
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let outcome = match report_rx.await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(err)) => Err(err.to_string()),
            Err(_) => Err("workflow task terminated unexpectedly".to_string()),
        };
        let _ = tx.send(outcome);
    });
    rx
}
