use std::process::ExitCode;

use prerender_lib::{
    BotSignature, ConfigProvider, DetectOutput, PrerenderOutput, PRERENDER_OUTPUT_VERSION,
};

use crate::cli::OutputFormat;
use crate::formatting::write_output;

/// Run the detect command. Exits 0 whether or not the agent is a bot.
pub fn run_detect(provider: &ConfigProvider, user_agent: String, format: OutputFormat) -> ExitCode {
    let signature = provider
        .matcher()
        .matching(Some(user_agent.as_str()))
        .map(BotSignature::name)
        .map(str::to_string);
    tracing::debug!(user_agent = %user_agent, signature = ?signature, "Classified user agent");

    let body = PrerenderOutput::Detect(DetectOutput {
        version: PRERENDER_OUTPUT_VERSION.to_string(),
        bot: signature.is_some(),
        user_agent,
        signature,
    });
    write_output(&body, format);
    ExitCode::SUCCESS
}
