//! Caduceus assessment core demo CLI.
//!
//! Drives the graph stores, reasoner, and checker through the same
//! service facade the request layer uses, with a scripted keyword
//! extractor standing in for the LLM oracle.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- assess
//!   cargo run -p demo -- interactions Aspirin Warfarin
//!   cargo run -p demo -- compatibility --current Warfarin --candidate Aspirin
//!   cargo run -p demo -- otc --symptoms headache --current Warfarin

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use caduceus_contracts::{
    AssessmentId, CaduceusResult, FillLevel, ImageClassification, ObservedSymptoms,
    SymptomExtraction,
};
use caduceus_graph::{ConditionGraph, InteractionGraph};
use caduceus_service::{AssessmentService, ImageClassifier, SymptomExtractor};

// ── CLI definition ────────────────────────────────────────────────────────────

/// Caduceus — graph-backed healthcare assessment demo.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "Caduceus assessment core demo",
    long_about = "Runs the caduceus assessment scenarios: conversational symptom\n\
                  triage, interaction checking, compatibility verdicts, and OTC\n\
                  recommendation, all over the seeded graph stores."
)]
struct Cli {
    /// Optional formulary seed file overriding the built-in seed.
    #[arg(long, global = true)]
    formulary: Option<PathBuf>,

    /// Optional condition seed file overriding the built-in seed.
    #[arg(long, global = true)]
    conditions: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every scenario in sequence.
    RunAll,
    /// Scripted conversational assessment over three patient messages.
    Assess,
    /// Report known interactions among the given medications.
    Interactions {
        /// Medication names to check pairwise.
        #[arg(required = true)]
        meds: Vec<String>,
    },
    /// Check whether one candidate medication is safe to add.
    Compatibility {
        /// Current prescriptions.
        #[arg(long, num_args = 0..)]
        current: Vec<String>,
        /// The medication being considered.
        #[arg(long)]
        candidate: String,
    },
    /// Recommend OTC medications for symptoms, checked against prescriptions.
    Otc {
        /// Reported symptoms.
        #[arg(long, required = true, num_args = 1..)]
        symptoms: Vec<String>,
        /// Current prescriptions.
        #[arg(long, num_args = 0..)]
        current: Vec<String>,
    },
}

// ── Scripted oracles ──────────────────────────────────────────────────────────

/// Deterministic stand-in for the LLM extractor: a symptom is "mentioned"
/// when its id (underscores read as spaces) appears in the message.
struct KeywordExtractor;

impl SymptomExtractor for KeywordExtractor {
    fn extract(&self, text: &str, known_symptoms: &[&str]) -> CaduceusResult<SymptomExtraction> {
        let haystack = text.to_lowercase();
        let symptoms: Vec<String> = known_symptoms
            .iter()
            .filter(|id| {
                let phrase = id.replace('_', " ");
                haystack.contains(&phrase) || haystack.contains(*id)
            })
            .map(|id| id.to_string())
            .collect();

        Ok(SymptomExtraction {
            message: if symptoms.is_empty() {
                "I did not catch any symptoms there. Can you tell me more?".to_string()
            } else {
                format!("Noted: {}. Anything else?", symptoms.join(", "))
            },
            needs_more_info: true,
            symptoms,
        })
    }
}

/// Fixed stand-in for the CNN classifier.
struct StubClassifier;

impl ImageClassifier for StubClassifier {
    fn classify(&self, _image_ref: &str) -> CaduceusResult<ImageClassification> {
        Ok(ImageClassification {
            fill_level: FillLevel::Half,
            confidence: 0.9,
            probabilities: Default::default(),
        })
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging. Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = build_service(&cli).and_then(|service| {
        print_banner(&service);
        match cli.command {
            Command::RunAll => run_all(&service),
            Command::Assess => run_assess(&service),
            Command::Interactions { ref meds } => run_interactions(&service, meds),
            Command::Compatibility { ref current, ref candidate } => {
                run_compatibility(&service, current, candidate)
            }
            Command::Otc { ref symptoms, ref current } => run_otc(&service, symptoms, current),
        }
    });

    match result {
        Ok(()) => println!("Done."),
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

fn build_service(cli: &Cli) -> CaduceusResult<AssessmentService> {
    let formulary = InteractionGraph::load(cli.formulary.as_deref())?;
    let conditions = ConditionGraph::load(cli.conditions.as_deref())?;
    Ok(AssessmentService::new(
        formulary,
        conditions,
        Box::new(KeywordExtractor),
        Box::new(StubClassifier),
    ))
}

// ── Scenario dispatch ─────────────────────────────────────────────────────────

fn run_all(service: &AssessmentService) -> CaduceusResult<()> {
    run_assess(service)?;
    run_interactions(
        service,
        &["Aspirin".into(), "Warfarin".into(), "Omeprazole".into()],
    )?;
    run_compatibility(service, &["Warfarin".into()], "Aspirin")?;
    run_otc(service, &["headache".into()], &["Warfarin".into()])?;
    Ok(())
}

fn run_assess(service: &AssessmentService) -> CaduceusResult<()> {
    println!("=== Scenario: Conversational Assessment ===");
    println!();

    let messages = [
        "I have a runny nose and my throat is sore",
        "Yes, I have been coughing a lot too",
        "Mostly I just feel fatigue all day",
    ];

    let assessment_id = AssessmentId::new();
    let mut observed = ObservedSymptoms::new();

    for message in messages {
        println!("  Patient: {message}");
        let turn = service.assess_message(&assessment_id, &mut observed, message);
        println!("  Assistant: {}", turn.message);

        if turn.insufficient_data {
            println!("    (no ranking possible yet)");
        }
        for score in turn.ranked_conditions.iter().take(3) {
            println!("    {:<20} confidence {:.3}", score.condition, score.confidence);
        }
        if !turn.suggested_symptoms.is_empty() {
            println!("    ask next: {}", turn.suggested_symptoms.join(", "));
        }
        println!();
    }

    Ok(())
}

fn run_interactions(service: &AssessmentService, meds: &[String]) -> CaduceusResult<()> {
    println!("=== Scenario: Interaction Check ===");
    println!();
    println!("  Medications: {}", meds.join(", "));

    let findings = service.check_interactions(meds);
    if findings.is_empty() {
        println!("  No known interactions.");
    }
    for finding in &findings {
        println!(
            "  {} + {} -> {}",
            finding.drug1, finding.drug2, finding.severity
        );
    }
    println!();
    Ok(())
}

fn run_compatibility(
    service: &AssessmentService,
    current: &[String],
    candidate: &str,
) -> CaduceusResult<()> {
    println!("=== Scenario: Compatibility Check ===");
    println!();
    println!("  Current:   {}", current.join(", "));
    println!("  Candidate: {}", candidate);

    let (allowed, report) = service.can_prescribe(current, candidate);
    println!("  Compatible:            {}", report.is_compatible);
    println!("  Interactions found:    {}", report.interactions_found);
    println!("  Recommendation:        {}", report.recommendation);
    println!(
        "  Automatic prescribing: {}",
        if allowed { "permitted" } else { "refused" }
    );

    if !allowed {
        if let Some(category) = service
            .formulary()
            .record(candidate)
            .map(|r| r.category.clone())
        {
            let alternatives = service.safe_alternatives(&category, current);
            if alternatives.is_empty() {
                println!("  No safe {category} alternatives for this patient.");
            } else {
                println!("  Safe {category} alternatives: {}", alternatives.join(", "));
            }
        }
    }
    println!();
    Ok(())
}

fn run_otc(
    service: &AssessmentService,
    symptoms: &[String],
    current: &[String],
) -> CaduceusResult<()> {
    println!("=== Scenario: OTC Recommendation ===");
    println!();
    println!("  Symptoms: {}", symptoms.join(", "));
    println!(
        "  Current prescriptions: {}",
        if current.is_empty() {
            "none".to_string()
        } else {
            current.join(", ")
        }
    );

    let advice = service.recommend_otc(symptoms, current);
    println!(
        "  Checked {} candidate(s), {} safe",
        advice.total_checked, advice.safe_count
    );
    for candidate in &advice.safe {
        println!("    safe:   {}", candidate.medication);
    }
    for candidate in &advice.warned {
        let pairs: Vec<String> = candidate
            .interactions
            .iter()
            .map(|f| format!("{} + {} ({})", f.drug1, f.drug2, f.severity))
            .collect();
        println!("    warned: {} [{}]", candidate.medication, pairs.join("; "));
    }
    println!();
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner(service: &AssessmentService) {
    let formulary = service.formulary().metrics();
    let conditions = service.conditions().metrics();
    println!();
    println!("Caduceus - Healthcare Assessment Core");
    println!("=====================================");
    println!();
    println!(
        "  Formulary graph:  {} nodes, {} interaction edges",
        formulary.nodes, formulary.edges
    );
    println!(
        "  Condition graph:  {} nodes, {} weighted edges",
        conditions.nodes, conditions.edges
    );
    println!();
}
