//! The per-workflow state machine (`spec.md` §4.G):
//!
//! `START → ANALYZE_MEDICAL → ASSESS_RISK → AGENT(medical_reviewer) →
//! AGENT(fraud_detector) → AGENT(risk_assessor) →
//! AGENT(premium_calculator) → AGENT(decision_maker) → ASSEMBLE → DONE`.
//!
//! Grounded on `streaming_orchestrator.py::StreamingOrchestrator` for
//! the stage sequencing, event shapes, and case-context accumulation;
//! unlike the source, a failed agent call is terminal for the workflow
//! rather than skipped over (`spec.md` §4.G/§7, `DESIGN.md` Open
//! Question 5).

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use domain_underwriting::{
    assembly, loading, medical, parser, premium, risk, Applicant, ExtractedMedical,
    MedicalFindings, RiskAssessment, UnderwritingDecision, UnderwritingReport,
};
use serde_json::json;
use thiserror::Error;
use tokio::sync::broadcast;

use crate::events::{AgentStatus, WorkflowEvent};
use crate::prompts::{AgentDefinition, AGENT_WORKFLOW};
use crate::runner::{AgentError, AgentRunnerPort};
use core_kernel::EventId;

/// Size of the agent-call context carried forward into later agents
/// (`spec.md` §4.G: "the first 500 characters").
const PREVIOUS_ANALYSIS_EXCERPT_LEN: usize = 500;

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Gates the `16,770` hard-coded per-cover premium split
    /// (`spec.md` §4.F, §9 Open Question 3).
    pub strict_premium_conformance: bool,
    /// The contractual pause between agent stages (`spec.md` §4.G,
    /// §5: "rate-limit smoothing; makes streaming visibly stepped").
    pub inter_agent_pause: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            strict_premium_conformance: true,
            inter_agent_pause: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("agent call failed: {0}")]
    Agent(#[from] AgentError),
}

/// Drives one workflow's agents in fixed order and emits `WorkflowEvent`s
/// onto the workflow's bus (`spec.md` §4.H). Broadcasting rather than a
/// bounded mpsc matches the spec's "bounded buffer; overflow drops
/// oldest per lagging subscriber" contract directly: a lagging
/// `broadcast::Receiver` observes `RecvError::Lagged` rather than
/// blocking the producer.
pub struct Orchestrator {
    runner: Arc<dyn AgentRunnerPort>,
    config: OrchestratorConfig,
}

impl Orchestrator {
    pub fn new(runner: Arc<dyn AgentRunnerPort>, config: OrchestratorConfig) -> Self {
        Self { runner, config }
    }

    /// Runs the full pipeline for one application, broadcasting a
    /// `WorkflowEvent` per stage transition onto `events`. Returns the
    /// assembled report on success; on the first agent failure the
    /// workflow is terminal and an `AgentCallFailed`-carrying error is
    /// returned after an `Error` event has already been broadcast.
    pub async fn run(
        &self,
        applicant: Applicant,
        extracted: ExtractedMedical,
        events: &broadcast::Sender<WorkflowEvent>,
    ) -> Result<UnderwritingReport, OrchestratorError> {
        let started_at = Utc::now();
        let mut counter: u32 = 0;
        let mut next_id = move || {
            counter += 1;
            EventId::new(started_at, counter)
        };

        let emit = |event: WorkflowEvent| {
            // No subscribers is not an error; nobody is listening yet or
            // everyone has detached. The workflow still runs to completion.
            let _ = events.send(event);
        };

        emit(WorkflowEvent::new(
            &next_id(),
            "System",
            "Workflow Orchestrator",
            AgentStatus::Active,
            format!("Starting underwriting workflow for {}", applicant.name),
            None,
            json!({ "total_agents": AGENT_WORKFLOW.len() }),
        ));

        // --- Stage: Medical Analyzer (4.A) ---
        emit(WorkflowEvent::new(
            &next_id(),
            "MedicalAnalyzer",
            "ML Medical Data Analyzer",
            AgentStatus::Active,
            "Analyzing medical data...",
            None,
            json!({}),
        ));
        let findings = medical::analyze(&extracted);
        emit(WorkflowEvent::new(
            &next_id(),
            "MedicalAnalyzer",
            "ML Medical Data Analyzer",
            AgentStatus::Completed,
            "Medical data analysis complete",
            Some(format!(
                "Found {} normal, {} abnormal, {} critical findings",
                findings.normal_values.len(),
                findings.abnormal_values.len(),
                findings.critical_alerts.len()
            )),
            json!({
                "normal_count": findings.normal_values.len(),
                "abnormal_count": findings.abnormal_values.len(),
                "critical_count": findings.critical_alerts.len(),
                "risk_score": findings.risk_score,
            }),
        ));

        // --- Stage: Risk Engine (4.B) ---
        emit(WorkflowEvent::new(
            &next_id(),
            "RiskAssessmentML",
            "ML Risk Assessment Engine",
            AgentStatus::Active,
            "Computing risk scores...",
            None,
            json!({}),
        ));
        let risk_assessment = risk::assess(&applicant, &findings);
        emit(WorkflowEvent::new(
            &next_id(),
            "RiskAssessmentML",
            "ML Risk Assessment Engine",
            AgentStatus::Completed,
            format!(
                "Risk assessment complete - {:?}",
                risk_assessment.overall_level
            ),
            Some(format!("Overall Risk Score: {}", risk_assessment.risk_score)),
            json!({
                "risk_score": risk_assessment.risk_score,
                "medical_risk": risk_assessment.medical_risk,
                "lifestyle_risk": risk_assessment.lifestyle_risk,
                "financial_risk": risk_assessment.financial_risk,
                "occupation_risk": risk_assessment.occupation_risk,
                "red_flags": risk_assessment.red_flags,
            }),
        ));

        // The Loading Engine (4.C) is a deterministic backbone computation,
        // not a streamed stage: it has no corresponding named agent in
        // spec.md's "8 completed events" invariant. Its result takes top
        // precedence in the Premium Calculator's reconciliation (4.F).
        let loading_result = loading::calculate(&applicant, &extracted);

        let case_context = build_case_context(&applicant, &findings, &risk_assessment);

        // --- Stages: the five LLM agents (4.D/4.G), context accumulating ---
        let mut transcript = domain_underwriting::AgentTranscript::default();
        let mut prior_analyses: Vec<(&'static str, String)> = Vec::with_capacity(AGENT_WORKFLOW.len());

        for agent in AGENT_WORKFLOW.iter() {
            emit(WorkflowEvent::new(
                &next_id(),
                agent.agent_name,
                agent.agent_role,
                AgentStatus::Active,
                format!("{} is analyzing the case...", agent.agent_role),
                None,
                json!({}),
            ));

            let agent_context = build_agent_context(&case_context, &prior_analyses);

            let response = match self
                .runner
                .run(agent.stage, agent.system_prompt, &agent_context)
                .await
            {
                Ok(text) => text,
                Err(err) => {
                    emit(WorkflowEvent::new(
                        &next_id(),
                        agent.agent_name,
                        agent.agent_role,
                        AgentStatus::Error,
                        format!("Agent failed: {err}"),
                        None,
                        json!({}),
                    ));
                    return Err(OrchestratorError::Agent(err));
                }
            };

            emit(WorkflowEvent::new(
                &next_id(),
                agent.agent_name,
                agent.agent_role,
                AgentStatus::Completed,
                format!("{} completed analysis", agent.agent_role),
                Some(response.clone()),
                json!({ "response_length": response.chars().count() }),
            ));

            transcript.set(agent.stage.as_underwriting_stage(), response.clone());
            prior_analyses.push((agent.key, response));

            tokio::time::sleep(self.config.inter_agent_pause).await;
        }

        // --- Final assembly (4.G) ---
        emit(WorkflowEvent::new(
            &next_id(),
            "ReportGenerator",
            "Report Generation Engine",
            AgentStatus::Active,
            "Compiling final underwriting report...",
            None,
            json!({}),
        ));

        let premium_text = transcript.premium_calculation.clone().unwrap_or_default();
        let decision_text = transcript.final_decision.clone().unwrap_or_default();

        let premium_info = parser::parse_premium(&premium_text);
        let decision_details = parser::parse_decision(&decision_text, &premium_info);

        let premiums = if decision_details.decision == UnderwritingDecision::Declined {
            Vec::new()
        } else {
            premium::compute(
                &applicant,
                &decision_details,
                Some(&risk_assessment),
                Some(&loading_result),
                self.config.strict_premium_conformance,
            )
        };

        let conditions = assembly::generate_conditions(&risk_assessment);

        let mut exclusions = decision_details.exclusions.clone();
        for e in assembly::generate_exclusions(&findings) {
            if !exclusions.contains(&e) {
                exclusions.push(e);
            }
        }

        let reasoning = parser::build_reasoning(
            &decision_text,
            decision_details.decision,
            &decision_details,
            findings.abnormal_values.len(),
            findings.critical_alerts.len(),
        );

        let confidence_score =
            assembly::confidence_score(decision_details.decision, &risk_assessment, &findings);

        let report = UnderwritingReport {
            application_id: applicant.application_id.clone(),
            applicant_name: applicant.name.clone(),
            final_decision: decision_details.decision,
            confidence_score,
            risk_assessment,
            medical_findings: findings,
            loading_result,
            premiums,
            conditions,
            exclusions,
            reasoning,
            created_at: Utc::now(),
            agent_transcript: transcript,
        };

        emit(WorkflowEvent::new(
            &next_id(),
            "ReportGenerator",
            "Report Generation Engine",
            AgentStatus::Completed,
            format!("Underwriting decision: {:?}", report.final_decision),
            Some(report_summary_text(&report)),
            json!({
                "decision": format!("{:?}", report.final_decision),
                "confidence_score": report.confidence_score,
            }),
        ));

        emit(WorkflowEvent::new(
            &next_id(),
            "System",
            "Workflow Orchestrator",
            AgentStatus::Completed,
            "Underwriting workflow completed successfully",
            None,
            json!({ "decision": format!("{:?}", report.final_decision) }),
        ));

        Ok(report)
    }
}

/// `spec.md` §4.G "the case context plus summaries (first 500
/// characters) of each prior agent's output, under the header
/// 'PREVIOUS AGENT ANALYSES'".
fn build_agent_context(case_context: &str, prior: &[(&'static str, String)]) -> String {
    if prior.is_empty() {
        return case_context.to_string();
    }
    let mut context = String::from(case_context);
    context.push_str("\n\nPREVIOUS AGENT ANALYSES:\n");
    for (key, analysis) in prior {
        let excerpt: String = analysis.chars().take(PREVIOUS_ANALYSIS_EXCERPT_LEN).collect();
        context.push_str(&format!("\n{}:\n{excerpt}\n", key.to_uppercase().replace('_', " ")));
    }
    context
}

/// Builds the shared case context handed to every agent
/// (`streaming_orchestrator.py::_build_case_context`).
fn build_case_context(
    applicant: &Applicant,
    findings: &MedicalFindings,
    risk: &RiskAssessment,
) -> String {
    let total_sum_assured: rust_decimal::Decimal = applicant
        .covers_requested
        .iter()
        .map(|c| c.sum_assured)
        .sum();

    format!(
        "UNDERWRITING CASE: {name} (Age: {age})\n\n\
         BASIC INFO: {occupation} | Income: {income} | Coverage: {coverage}\n\n\
         KEY MEDICAL DATA:\n\
         - Critical Alerts: {critical}\n\
         - Abnormal Findings: {abnormal}\n\
         - Red Flags: {flags}\n\n\
         LIFESTYLE: {smoker} | BMI: {bmi:.1}\n\n\
         RISK SCORES:\n\
         - Overall Risk: {level:?} ({score})\n\
         - Medical: {medical} | Lifestyle: {lifestyle}\n\
         - Financial: {financial} | Occupational: {occupation_risk}\n\n\
         WORKFLOW: Medical Review -> Fraud Detection -> Risk Assessment -> Premium Calculation -> Final Decision",
        name = applicant.name,
        age = applicant.age,
        occupation = applicant.occupation.as_deref().unwrap_or("Unknown"),
        income = applicant.annual_income.map(|i| i.to_string()).unwrap_or_else(|| "Unknown".to_string()),
        coverage = total_sum_assured,
        critical = safe_join(&findings.critical_alerts, 2),
        abnormal = safe_join(&findings.abnormal_values, 3),
        flags = safe_join(&risk.red_flags, 2),
        smoker = if applicant.lifestyle.smoker { "Smoker" } else { "Non-smoker" },
        bmi = risk::bmi(applicant),
        level = risk.overall_level,
        score = risk.risk_score,
        medical = risk.medical_risk,
        lifestyle = risk.lifestyle_risk,
        financial = risk.financial_risk,
        occupation_risk = risk.occupation_risk,
    )
}

fn safe_join(items: &[String], take: usize) -> String {
    if items.is_empty() {
        return "None".to_string();
    }
    items.iter().take(take).cloned().collect::<Vec<_>>().join(", ")
}

fn report_summary_text(report: &UnderwritingReport) -> String {
    let total_final_premium: rust_decimal::Decimal = report
        .premiums
        .iter()
        .map(|p| p.final_premium.amount())
        .sum();
    format!(
        "decision={:?} confidence={} total_final_premium={} conditions={} exclusions={}",
        report.final_decision,
        report.confidence_score,
        total_final_premium,
        report.conditions.len(),
        report.exclusions.len(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use domain_underwriting::{CoverRequest, CoverType, Gender, Lifestyle, Physical};
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Table-driven fake substituting the LLM, keyed by stage
    /// (`spec.md` §9 "LLM nondeterminism in tests").
    struct FakeAgentRunner {
        responses: Mutex<HashMap<crate::prompts::AgentStage, String>>,
        fail: Option<crate::prompts::AgentStage>,
    }

    #[async_trait]
    impl AgentRunnerPort for FakeAgentRunner {
        async fn run(
            &self,
            stage: crate::prompts::AgentStage,
            _system_prompt: &str,
            _user_context: &str,
        ) -> Result<String, AgentError> {
            if self.fail == Some(stage) {
                return Err(AgentError::AgentCallFailed {
                    stage,
                    cause: "simulated failure".to_string(),
                });
            }
            Ok(self
                .responses
                .lock()
                .unwrap()
                .get(&stage)
                .cloned()
                .unwrap_or_else(|| "generic response".to_string()))
        }
    }

    fn healthy_applicant() -> Applicant {
        Applicant {
            application_id: "APP001".into(),
            name: "Jordan Lee".into(),
            age: 28,
            gender: Gender::Male,
            occupation: Some("Accountant".into()),
            annual_income: Some(dec!(1_500_000)),
            covers_requested: vec![CoverRequest {
                cover_type: CoverType::TermLifeInsurance,
                sum_assured: dec!(5_000_000),
                term: 20,
            }],
            lifestyle: Lifestyle::default(),
            physical: Physical {
                height_cm: Some(dec!(175)),
                weight_kg: Some(dec!(70)),
            },
        }
    }

    fn canned_responses() -> HashMap<crate::prompts::AgentStage, String> {
        use crate::prompts::AgentStage::*;
        let mut m = HashMap::new();
        m.insert(MedicalReviewer, "No significant findings. ENHANCED MEDICAL LOADING: 0%. ML-ENHANCED MEDICAL ANALYSIS COMPLETE".to_string());
        m.insert(FraudDetector, "LOW FRAUD RISK: data is consistent. FRAUD DETECTION COMPLETE".to_string());
        m.insert(RiskAssessor, "FINAL RISK SCORE: 0.95, LOW RISK. ML-ENHANCED RISK ASSESSMENT COMPLETE".to_string());
        m.insert(PremiumCalculator, "Term Life: = ₹6,000\nTOTAL Annual Premium = ₹6,000\nPREMIUM CALCULATION COMPLETE".to_string());
        m.insert(DecisionMaker, "DECISION: APPROVED for standard coverage. UNDERWRITING DECISION FINAL - CONVERSATION TERMINATED".to_string());
        m
    }

    #[tokio::test(start_paused = true)]
    async fn healthy_young_adult_is_auto_approved_with_eight_completed_events() {
        let runner = Arc::new(FakeAgentRunner {
            responses: Mutex::new(canned_responses()),
            fail: None,
        });
        let orchestrator = Orchestrator::new(
            runner,
            OrchestratorConfig {
                strict_premium_conformance: true,
                inter_agent_pause: Duration::from_millis(0),
            },
        );

        let (tx, mut rx) = broadcast::channel(64);
        let extracted = ExtractedMedical::default();

        let report = orchestrator
            .run(healthy_applicant(), extracted, &tx)
            .await
            .unwrap();

        assert_eq!(report.final_decision, UnderwritingDecision::AutoApproved);
        assert!(report.confidence_score >= dec!(0.95));
        assert_eq!(report.premiums.len(), 1);

        drop(tx);
        let mut completed_names = Vec::new();
        while let Ok(event) = rx.recv().await {
            if event.status == AgentStatus::Completed {
                completed_names.push(event.agent_name);
            }
        }
        let distinct: std::collections::HashSet<_> = completed_names.into_iter().collect();
        assert_eq!(distinct.len(), 8);
    }

    #[tokio::test(start_paused = true)]
    async fn agent_failure_is_terminal_for_the_workflow() {
        let runner = Arc::new(FakeAgentRunner {
            responses: Mutex::new(canned_responses()),
            fail: Some(crate::prompts::AgentStage::RiskAssessor),
        });
        let orchestrator = Orchestrator::new(
            runner,
            OrchestratorConfig {
                strict_premium_conformance: true,
                inter_agent_pause: Duration::from_millis(0),
            },
        );

        let (tx, mut rx) = broadcast::channel(64);
        let result = orchestrator
            .run(healthy_applicant(), ExtractedMedical::default(), &tx)
            .await;
        assert!(result.is_err());

        drop(tx);
        let mut saw_error = false;
        while let Ok(event) = rx.recv().await {
            if event.status == AgentStatus::Error {
                saw_error = true;
            }
        }
        assert!(saw_error);
    }

    #[test]
    fn event_ids_are_strictly_increasing_within_a_workflow() {
        let started = Utc::now();
        let mut counter = 0u32;
        let mut ids = Vec::new();
        for _ in 0..5 {
            counter += 1;
            ids.push(EventId::new(started, counter).to_string());
        }
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }
}
