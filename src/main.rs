//! router-sim - drive the router against synthetic providers
//!
//! Each configured provider gets a random latency, error and cost profile.
//! Requests are routed, "dispatched" to the simulated provider, and their
//! outcomes fed back, so the load balancer and selectors learn as they would
//! in production.

#![allow(missing_docs)]

use adaptive_router::config::{
    LoadBalancerConfig, ProviderProfileConfig, RouterSettings, SelectorConfig,
};
use adaptive_router::utils::logging::init_logging;
use adaptive_router::{
    AIRequest, LoadBalancer, LoadBalancerStats, MLModelSelector, ModelStats, ProviderCapability,
    RequestOutcome, RoutingPipeline, Strategy,
};
use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "router-sim", version, about = "Simulate adaptive request routing")]
struct Args {
    /// YAML settings file; a built-in demo setup is used when omitted
    #[arg(short, long, env = "ROUTER_CONFIG")]
    config: Option<PathBuf>,

    /// Number of requests to simulate
    #[arg(short = 'n', long, default_value_t = 200)]
    requests: usize,

    /// Seed for the simulation and for weighted selection
    #[arg(long)]
    seed: Option<u64>,

    /// Override the routing strategy
    #[arg(long)]
    strategy: Option<String>,

    /// Providers that fail every request
    #[arg(long = "fail-provider")]
    fail_providers: Vec<String>,

    /// Persist model statistics under the configured storage directory
    #[arg(long)]
    persist: bool,

    /// Print the final report as JSON
    #[arg(long)]
    json: bool,
}

/// Synthetic behaviour of one provider
#[derive(Debug, Clone)]
struct SimulatedProvider {
    base_latency: f64,
    error_rate: f64,
    cost: f64,
}

#[derive(Debug, Serialize)]
struct Report {
    requests: usize,
    unrouted: usize,
    providers: BTreeMap<String, usize>,
    models: BTreeMap<String, usize>,
    load_balancer: LoadBalancerStats,
    selectors: Vec<ModelStats>,
}

const PROMPTS: &[&str] = &[
    "Turn off the living room lights",
    "What is the weather forecast for tomorrow?",
    "Summarize the last week of energy usage",
    "Compare heating costs between January and February",
    "Write a short poem about the garden",
    "def schedule(device, at):\n    return at",
    "Give me a detailed, step by step plan to automate the garage door",
    "Who is at the front door?",
];

fn demo_settings() -> RouterSettings {
    let provider = |name: &str, priority: u32, vision: bool| ProviderProfileConfig {
        name: name.to_string(),
        priority,
        weight: 1.0,
        capabilities: if vision {
            vec![ProviderCapability::Chat, ProviderCapability::Vision]
        } else {
            vec![ProviderCapability::Chat]
        },
    };

    let mut tiers = HashMap::new();
    tiers.insert(
        "performance".to_string(),
        vec!["openai".to_string(), "anthropic".to_string()],
    );
    tiers.insert(
        "balanced".to_string(),
        vec!["anthropic".to_string(), "ollama".to_string()],
    );
    tiers.insert("economy".to_string(), vec!["ollama".to_string()]);

    RouterSettings {
        load_balancer: LoadBalancerConfig {
            strategy: Strategy::HealthBased,
            cost_optimization_tiers: tiers,
            providers: vec![
                provider("openai", 1, true),
                provider("anthropic", 1, true),
                provider("ollama", 2, false),
            ],
            ..Default::default()
        },
        selectors: vec![
            SelectorConfig::new(
                "ollama",
                vec!["llama3".into(), "mistral".into(), "phi3".into()],
                "llama3",
            ),
            SelectorConfig::new(
                "openai",
                vec!["gpt-4o".into(), "gpt-4o-mini".into()],
                "gpt-4o-mini",
            ),
        ],
        ..Default::default()
    }
}

async fn load_settings(args: &Args) -> Result<RouterSettings> {
    let mut settings = match &args.config {
        Some(path) => RouterSettings::from_file(path)
            .await
            .with_context(|| format!("loading {}", path.display()))?,
        None => {
            let mut settings = demo_settings();
            settings.apply_env_overrides()?;
            settings
        }
    };

    if let Some(strategy) = &args.strategy {
        settings.load_balancer.strategy = Strategy::parse_or_default(strategy);
    }
    settings.validate()?;
    Ok(settings)
}

fn build_pipeline(settings: &RouterSettings, args: &Args) -> Result<RoutingPipeline> {
    let lb = match args.seed {
        Some(seed) => LoadBalancer::with_seed(&settings.load_balancer, seed),
        None => LoadBalancer::from_config(&settings.load_balancer),
    };
    if args.persist {
        return RoutingPipeline::from_settings_with(settings, lb)
            .context("opening performance store");
    }

    let mut pipeline = RoutingPipeline::new(lb);
    for config in &settings.selectors {
        pipeline.add_selector(MLModelSelector::in_memory(config.clone()));
    }
    Ok(pipeline)
}

fn simulate_providers(
    names: &[String],
    failing: &[String],
    rng: &mut StdRng,
) -> HashMap<String, SimulatedProvider> {
    names
        .iter()
        .map(|name| {
            let sim = SimulatedProvider {
                base_latency: rng.gen_range(0.3..4.0),
                error_rate: if failing.contains(name) {
                    1.0
                } else {
                    rng.gen_range(0.01..0.2)
                },
                cost: rng.gen_range(0.0..0.02),
            };
            info!(provider = %name, ?sim, "Simulated provider");
            (name.clone(), sim)
        })
        .collect()
}

/// Later models in a selector's list are a little slower and less reliable
fn outcome(
    sim: &SimulatedProvider,
    model_rank: usize,
    rng: &mut StdRng,
) -> RequestOutcome {
    let penalty = 1.0 + 0.35 * model_rank as f64;
    let latency = sim.base_latency * penalty * rng.gen_range(0.7..1.3);
    let error_rate = (sim.error_rate * penalty).min(1.0);
    if rng.gen_bool(error_rate) {
        RequestOutcome::failure(latency * 2.0)
    } else {
        RequestOutcome::success(latency, sim.cost * penalty)
    }
}

fn print_report(report: &Report) {
    println!(
        "Routed {} of {} requests (strategy {})",
        report.requests - report.unrouted,
        report.requests,
        report.load_balancer.strategy
    );
    println!();
    println!(
        "{:<12} {:>8} {:>8} {:>8} {:>10} {:>10}",
        "provider", "chosen", "health", "success", "latency", "circuit"
    );
    for (name, stats) in &report.load_balancer.providers {
        println!(
            "{:<12} {:>8} {:>8.3} {:>8.3} {:>9.2}s {:>10}",
            name,
            report.providers.get(name).copied().unwrap_or(0),
            stats.health_score,
            stats.reliability_score,
            stats.avg_response_time,
            stats.circuit_state
        );
    }
    println!();
    println!("{:<24} {:>8}", "model", "chosen");
    for (model, count) in &report.models {
        println!("{:<24} {:>8}", model, count);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let settings = load_settings(&args).await?;
    init_logging(&settings.logging);

    let pipeline = build_pipeline(&settings, &args)?;
    let profiles = settings.load_balancer.provider_profiles();
    anyhow::ensure!(!profiles.is_empty(), "no providers configured");

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut names: Vec<String> = profiles.keys().cloned().collect();
    names.sort();
    let sims = simulate_providers(&names, &args.fail_providers, &mut rng);

    let mut tiers: Vec<String> = settings
        .load_balancer
        .cost_optimization_tiers
        .keys()
        .cloned()
        .collect();
    tiers.sort();

    let mut report = Report {
        requests: args.requests,
        unrouted: 0,
        providers: BTreeMap::new(),
        models: BTreeMap::new(),
        load_balancer: pipeline.load_balancer().get_load_balancer_stats(),
        selectors: Vec::new(),
    };

    for i in 0..args.requests {
        let prompt = PROMPTS[rng.gen_range(0..PROMPTS.len())];
        let mut request = AIRequest::new(prompt).with_id(format!("sim-{}", i));
        if let Some(tier) = (!tiers.is_empty()).then(|| &tiers[rng.gen_range(0..tiers.len())]) {
            request = request.with_context("qualityTier", tier.as_str());
        }
        if rng.gen_bool(0.1) {
            request = request.with_image("/tmp/camera/front_door.jpg");
        }

        let Some(decision) = pipeline.route(&profiles, &request) else {
            report.unrouted += 1;
            continue;
        };

        let Some(sim) = sims.get(&decision.provider) else {
            continue;
        };
        let _in_flight = profiles
            .get(&decision.provider)
            .map(|profile| profile.begin_request());

        let rank = match (&decision.model, pipeline.selector(&decision.provider)) {
            (Some(model), Some(selector)) => {
                selector.models().iter().position(|m| m == model).unwrap_or(0)
            }
            _ => 0,
        };
        let result = outcome(sim, rank, &mut rng);

        if let Err(e) = pipeline.record_outcome(&decision, &request, &result) {
            warn!("Failed to record outcome: {}", e);
        }

        *report.providers.entry(decision.provider.clone()).or_default() += 1;
        if let Some(model) = &decision.model {
            *report
                .models
                .entry(format!("{}/{}", decision.provider, model))
                .or_default() += 1;
        }
    }

    report.load_balancer = pipeline.load_balancer().get_load_balancer_stats();
    let mut selectors: Vec<ModelStats> = pipeline
        .selectors()
        .values()
        .map(|s| s.get_model_stats())
        .collect();
    selectors.sort_by(|a, b| a.provider.cmp(&b.provider));
    report.selectors = selectors;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}
