mod cli;

use codecfit::{config, input};
use codecfit_common::{ConversionConfig, SourceMetadata};
use codecfit_rules::{
    allowed_presets, video_codec_label, AudioCodecRule, EncoderFamily, Normalizer, RuleTable,
};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "codecfit=debug,codecfit_rules=debug".to_string()
        } else {
            "codecfit=info,codecfit_rules=info".to_string()
        }
    });

    // stdout carries JSON, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Version = cli.command {
        println!("codecfit {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let settings = config::load_config_or_default(cli.config.as_deref())?;
    let pretty = settings.output.pretty;

    match cli.command {
        Commands::Normalize {
            input,
            metadata,
            explain,
        } => {
            let rules_path = config::rules_path(&settings, cli.rules.as_deref());
            let rules = config::load_rules(rules_path.as_deref())?;
            normalize(
                Normalizer::new(rules),
                input.as_deref(),
                metadata.as_deref(),
                explain,
                pretty,
            )
        }
        Commands::Containers { json } => {
            let rules_path = config::rules_path(&settings, cli.rules.as_deref());
            let rules = config::load_rules(rules_path.as_deref())?;
            list_containers(&rules, json, pretty)
        }
        Commands::Codecs { container, json } => {
            let rules_path = config::rules_path(&settings, cli.rules.as_deref());
            let rules = config::load_rules(rules_path.as_deref())?;
            show_codecs(&rules, &container, json, pretty)
        }
        Commands::Presets { codec } => show_presets(&codec),
        Commands::ValidateRules { file } => {
            let rules_path = config::rules_path(&settings, file.or(cli.rules).as_deref());
            validate_rules(rules_path.as_deref())
        }
        Commands::Version => Ok(()),
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", out);
    Ok(())
}

fn normalize(
    normalizer: Normalizer,
    input: Option<&Path>,
    metadata: Option<&Path>,
    explain: bool,
    pretty: bool,
) -> Result<()> {
    let config: ConversionConfig = input::read_json(input)?;
    let metadata: Option<SourceMetadata> = match metadata {
        Some(path) => Some(input::read_json(Some(path))?),
        None => None,
    };

    let report = normalizer.normalize_with_report(&config, metadata.as_ref());
    tracing::info!(
        "Normalized config for {} ({} adjustments)",
        report.config.container,
        report.adjustments.len()
    );

    if explain {
        print_json(&report, pretty)
    } else {
        print_json(&report.config, pretty)
    }
}

fn container_class(rules: &RuleTable, container: &str) -> &'static str {
    if rules.is_audio_only_container(container) {
        "audio-only"
    } else if !rules.container_supports_audio(container) {
        "silent"
    } else {
        "video"
    }
}

fn list_containers(rules: &RuleTable, json: bool, pretty: bool) -> Result<()> {
    if json {
        let entries: Vec<Value> = rules
            .containers()
            .iter()
            .map(|container| {
                json!({
                    "id": container,
                    "class": container_class(rules, container),
                    "subtitles": rules.container_supports_subtitles(container),
                })
            })
            .collect();
        return print_json(&entries, pretty);
    }

    println!("Containers: {}", rules.containers().len());
    for container in rules.containers() {
        print!("  {:<6} {}", container, container_class(rules, container));
        if rules.container_supports_subtitles(container) {
            print!(" [subtitles]");
        }
        println!();
    }

    Ok(())
}

fn show_codecs(rules: &RuleTable, container: &str, json: bool, pretty: bool) -> Result<()> {
    let audio_only = rules.is_audio_only_container(container);
    let video_codecs: Option<Vec<&String>> = if audio_only {
        Some(Vec::new())
    } else {
        rules
            .allowed_video_codecs(container)
            .map(|codecs| codecs.iter().collect())
    };
    let audio_codecs: Option<Vec<&String>> = if !rules.container_supports_audio(container) {
        Some(Vec::new())
    } else {
        match rules.allowed_audio_codecs(container) {
            Some(AudioCodecRule::Only(codecs)) => Some(codecs.iter().collect()),
            Some(AudioCodecRule::Any) | None => None,
        }
    };
    let fallback = (!audio_only).then(|| rules.first_allowed_video_codec(container));
    let default_audio = rules
        .container_supports_audio(container)
        .then(|| rules.default_audio_codec(container));

    if json {
        let video: Option<Vec<Value>> = video_codecs.as_ref().map(|codecs| {
            codecs
                .iter()
                .map(|id| json!({ "id": id, "label": video_codec_label(id) }))
                .collect()
        });
        let known = rules
            .containers()
            .iter()
            .any(|c| c.eq_ignore_ascii_case(container));
        return print_json(
            &json!({
                "container": container,
                "known": known,
                "class": container_class(rules, container),
                "videoCodecs": video,
                "audioCodecs": audio_codecs,
                "defaultAudioCodec": default_audio,
                "fallbackVideoCodec": fallback,
            }),
            pretty,
        );
    }

    println!("Container: {} ({})", container, container_class(rules, container));

    match &video_codecs {
        Some(codecs) if codecs.is_empty() => println!("\nVideo codecs: none"),
        Some(codecs) => {
            println!("\nVideo codecs: {}", codecs.len());
            for id in codecs {
                match video_codec_label(id) {
                    Some(label) => println!("  {:<18} {}", id, label),
                    None => println!("  {}", id),
                }
            }
        }
        None => println!("\nVideo codecs: any"),
    }
    if let Some(codec) = &fallback {
        println!("  fallback: {}", codec);
    }

    match &audio_codecs {
        Some(codecs) if codecs.is_empty() => println!("\nAudio codecs: none"),
        Some(codecs) => {
            println!("\nAudio codecs: {}", codecs.len());
            for id in codecs {
                println!("  {}", id);
            }
        }
        None => println!("\nAudio codecs: any"),
    }
    if let Some(codec) = default_audio {
        println!("  default: {}", codec);
    }

    Ok(())
}

fn show_presets(codec: &str) -> Result<()> {
    let family = EncoderFamily::of(codec);
    println!("Codec: {} ({})", codec, family);
    if family == EncoderFamily::VideoToolbox {
        println!("Presets are ignored by this encoder; any value is accepted.");
    }
    for preset in allowed_presets(codec) {
        println!("  {}", preset);
    }
    Ok(())
}

fn validate_rules(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => println!("Validating rule table: {:?}", p),
        None => println!("Validating bundled rule table"),
    }

    let table = match path {
        Some(p) => RuleTable::from_path(p)?,
        None => RuleTable::bundled()?,
    };
    let warnings = table.validate();

    println!("✓ Rule table loaded");
    println!("  Containers: {}", table.containers().len());
    println!("  Video containers: {}", table.video_containers().count());
    println!(
        "  Fallback order: {}",
        table.video_codec_fallback_order().join(", ")
    );

    if warnings.is_empty() {
        println!("  No warnings");
    } else {
        println!("  Warnings: {}", warnings.len());
        for warning in &warnings {
            println!("    - {}", warning);
        }
    }

    Ok(())
}
