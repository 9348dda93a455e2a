//! RxGuard command line: resolve a medication label, evaluate the rule set,
//! and print the answer as a card or raw JSON.

mod display;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use rxguard_baseline::{BaselineClient, BaselineConfig};
use rxguard_core::{PregnancyStatus, RxGuardProfile};
use rxguard_service::{BaselineSelector, RxGuardRequest, RxGuardService};
use rxguard_source::LabelSourceClient;
use rxguard_store::{DurableStore, ResolutionCache};

#[derive(Parser, Debug)]
#[command(name = "rxguard", version, about = "Label-backed medication safety answers")]
struct Cli {
    /// Medication name to resolve.
    #[arg(long)]
    drug: Option<String>,

    /// Free-text question passed to the baseline models.
    #[arg(long, default_value = "Is this medication safe for me to take?")]
    question: String,

    /// Other medication currently taken (repeatable).
    #[arg(long = "other-med")]
    other_meds: Vec<String>,

    /// Pregnancy status: not_pregnant, trying, first_trimester,
    /// second_trimester, third_trimester, unknown.
    #[arg(long)]
    pregnancy: Option<String>,

    /// Medical condition (repeatable).
    #[arg(long = "condition")]
    conditions: Vec<String>,

    /// Medication on the profile (repeatable).
    #[arg(long = "current-med")]
    current_meds: Vec<String>,

    /// Known allergy (repeatable).
    #[arg(long = "allergy")]
    allergies: Vec<String>,

    /// Directory for the durable cache tiers.
    #[arg(long, env = "RXGUARD_DATA_DIR", default_value = ".rxguard")]
    data_dir: PathBuf,

    /// Label source API key.
    #[arg(long, env = "OPENFDA_API_KEY")]
    api_key: Option<String>,

    /// Include baseline-model answers for comparison.
    #[arg(long)]
    with_baseline: bool,

    /// Which baseline models to consult: a, b, both.
    #[arg(long, default_value = "both")]
    baseline: String,

    /// Chat-completions baseline endpoint (model A).
    #[arg(long, env = "RXGUARD_BASELINE_A_URL")]
    baseline_a_url: Option<String>,

    #[arg(long, env = "RXGUARD_BASELINE_A_MODEL", default_value = "gpt-4o-mini")]
    baseline_a_model: String,

    #[arg(long, env = "RXGUARD_BASELINE_A_KEY")]
    baseline_a_key: Option<String>,

    /// Native-chat baseline endpoint (model B).
    #[arg(long, env = "RXGUARD_BASELINE_B_URL")]
    baseline_b_url: Option<String>,

    #[arg(long, env = "RXGUARD_BASELINE_B_MODEL", default_value = "llama3.1")]
    baseline_b_model: String,

    /// Emit the raw response contract as JSON instead of a card.
    #[arg(long)]
    json: bool,
}

fn parse_pregnancy(value: &str) -> anyhow::Result<PregnancyStatus> {
    match value {
        "not_pregnant" => Ok(PregnancyStatus::NotPregnant),
        "trying" => Ok(PregnancyStatus::Trying),
        "first_trimester" => Ok(PregnancyStatus::FirstTrimester),
        "second_trimester" => Ok(PregnancyStatus::SecondTrimester),
        "third_trimester" => Ok(PregnancyStatus::ThirdTrimester),
        "unknown" => Ok(PregnancyStatus::Unknown),
        other => anyhow::bail!("unrecognized pregnancy status: {other}"),
    }
}

fn parse_selector(value: &str) -> anyhow::Result<BaselineSelector> {
    match value {
        "a" => Ok(BaselineSelector::A),
        "b" => Ok(BaselineSelector::B),
        "both" => Ok(BaselineSelector::Both),
        other => anyhow::bail!("unrecognized baseline selector: {other}"),
    }
}

fn build_profile(cli: &Cli) -> anyhow::Result<Option<RxGuardProfile>> {
    let pregnancy = cli
        .pregnancy
        .as_deref()
        .map(parse_pregnancy)
        .transpose()?;
    if pregnancy.is_none()
        && cli.conditions.is_empty()
        && cli.current_meds.is_empty()
        && cli.allergies.is_empty()
    {
        return Ok(None);
    }
    Ok(Some(RxGuardProfile {
        age: None,
        sex: None,
        pregnancy,
        conditions: cli.conditions.clone(),
        current_meds: cli.current_meds.clone(),
        allergies: cli.allergies.clone(),
    }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    tracing::info!("rxguard v{}", env!("CARGO_PKG_VERSION"));
    let cli = Cli::parse();

    let durable = DurableStore::open(&cli.data_dir)
        .with_context(|| format!("opening data dir {}", cli.data_dir.display()))?;
    let source = LabelSourceClient::public(cli.api_key.clone());
    let cache = ResolutionCache::new(durable, source);

    let baseline_a = cli.baseline_a_url.clone().map(|url| {
        BaselineClient::new(BaselineConfig::chat_completions(
            url,
            cli.baseline_a_model.clone(),
            cli.baseline_a_key.clone(),
        ))
    });
    let baseline_b = cli.baseline_b_url.clone().map(|url| {
        BaselineClient::new(BaselineConfig::native_chat(
            url,
            cli.baseline_b_model.clone(),
        ))
    });
    let service = RxGuardService::with_baselines(cache, baseline_a, baseline_b);

    let request = RxGuardRequest {
        question: cli.question.clone(),
        primary_drug: cli.drug.clone(),
        other_meds: cli.other_meds.clone(),
        profile: build_profile(&cli)?,
        include_baseline_answer: cli.with_baseline,
        baseline_selector: Some(parse_selector(&cli.baseline)?),
    };

    let response = service.answer(&request).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        println!("{}", display::render(&response));
    }
    Ok(())
}
