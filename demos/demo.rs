//! Prints one problem per topic and checks the worked answer against its token.
//!
//! ```text
//! HMAC_SECRET=change-me-to-something-long RUST_LOG=debug cargo run --example demo
//! ```

use std::error::Error;

use adaptive_practice::{
    generate, verify, CodecConfig, CryptoContext, Lang, ProblemRequest, Topic,
};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,adaptive_practice=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let config = CodecConfig::from_env()?;
    let ctx = CryptoContext::from_config(&config)?;

    let lang = match std::env::var("LANG_CODE") {
        Ok(code) => code.parse::<Lang>()?,
        Err(_) => Lang::En,
    };

    for topic in Topic::ALL {
        for level in 1..=topic.max_level() {
            let problem = generate(&ctx, ProblemRequest {
                level,
                lang,
                ..ProblemRequest::new(topic)
            })?;

            println!("── {} (level {}, {}) ──", topic, problem.meta.level, problem.variation_key);
            println!("{}", problem.presentation.description);
            if let Some(formula) = &problem.presentation.formula {
                println!("    {formula}");
            }
            for (i, step) in problem.hints.iter().enumerate() {
                let text = step.text.as_deref().unwrap_or("");
                let formula = step.formula.as_deref().unwrap_or("");
                println!("  {}. {text} {formula}", i + 1);
            }

            let worked = problem
                .hints
                .last()
                .and_then(|h| h.formula.clone())
                .unwrap_or_default();
            println!(
                "  token {}… verifies worked answer: {}\n",
                problem.token.as_str().get(..16).unwrap_or_default(),
                verify(&ctx, &worked, problem.token.as_str()),
            );
        }
    }
    Ok(())
}
