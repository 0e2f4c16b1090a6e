//! LessonHub administration CLI.
//!
//! Operational tooling that runs against the same database and services
//! as the server: the overlap-correction backstop, availability
//! regeneration, and idempotent credit adjustments.

use clap::{Parser, Subcommand};
use uuid::Uuid;

use lessonhub_core::config::AppConfig;
use lessonhub_core::error::AppError;

mod context;

use context::CliContext;

#[derive(Parser)]
#[command(name = "lessonhub-cli", about = "LessonHub administration tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Cancel later-created bookings that overlap an earlier-created one.
    CorrectOverlaps {
        /// Report conflicts without cancelling anything.
        #[arg(long)]
        dry_run: bool,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Regenerate slot inventory from the weekly templates.
    RegenerateAvailability {
        /// Regenerate a single instructor (profile or user id). Omit for
        /// all instructors.
        #[arg(long)]
        instructor: Option<Uuid>,
    },
    /// Grant lesson credits to a learner, idempotently per reference.
    GrantCredits {
        /// Learner profile id (or owning user id).
        #[arg(long)]
        learner: Uuid,
        /// Number of credits to grant.
        #[arg(long)]
        credits: i32,
        /// Adjustment reference; repeating it is a no-op.
        #[arg(long)]
        reference: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("lessonhub=info")),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    let env = std::env::var("LESSONHUB_ENV").unwrap_or_else(|_| "development".to_string());
    let config = AppConfig::load(&env)?;
    let ctx = CliContext::build(&config).await?;

    match cli.command {
        Command::CorrectOverlaps { dry_run, yes } => {
            correct_overlaps(&ctx, dry_run, yes).await?;
        }
        Command::RegenerateAvailability { instructor } => {
            regenerate_availability(&ctx, instructor).await?;
        }
        Command::GrantCredits {
            learner,
            credits,
            reference,
        } => {
            grant_credits(&ctx, learner, credits, &reference).await?;
        }
    }

    Ok(())
}

async fn correct_overlaps(ctx: &CliContext, dry_run: bool, yes: bool) -> Result<(), AppError> {
    let conflicts = ctx.booking_service.correct_overlaps(true).await?;

    if conflicts.is_empty() {
        println!("No overlapping bookings found.");
        return Ok(());
    }

    println!("Found {} overlapping booking(s):", conflicts.len());
    for id in &conflicts {
        println!("  {id}");
    }

    if dry_run {
        println!("Dry run: nothing cancelled.");
        return Ok(());
    }

    if !yes {
        let confirmed = dialoguer::Confirm::new()
            .with_prompt("Cancel these bookings and refund their credits?")
            .default(false)
            .interact()
            .map_err(|e| AppError::internal(format!("Prompt failed: {e}")))?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    let cancelled = ctx.booking_service.correct_overlaps(false).await?;
    println!("Cancelled {} booking(s).", cancelled.len());
    Ok(())
}

async fn regenerate_availability(
    ctx: &CliContext,
    instructor: Option<Uuid>,
) -> Result<(), AppError> {
    match instructor {
        Some(id) => {
            let profile =
                lessonhub_service::resolve::resolve_instructor(&ctx.instructor_repo, id).await?;
            let summary = ctx.generator.regenerate(&profile).await?;
            println!(
                "Regenerated {} day(s), {} slot(s), re-applied {} reservation(s).",
                summary.days_generated, summary.slots_generated, summary.reservations_reapplied
            );
        }
        None => {
            let ids = ctx.instructor_repo.list_all_ids().await?;
            let mut total_days = 0u64;
            for id in &ids {
                if let Some(profile) = ctx.instructor_repo.find_by_id(*id).await? {
                    let summary = ctx.generator.regenerate(&profile).await?;
                    total_days += summary.days_generated;
                }
            }
            println!(
                "Regenerated availability for {} instructor(s) ({total_days} day records).",
                ids.len()
            );
        }
    }
    Ok(())
}

async fn grant_credits(
    ctx: &CliContext,
    learner: Uuid,
    credits: i32,
    reference: &str,
) -> Result<(), AppError> {
    if credits <= 0 {
        return Err(AppError::validation("Credits must be positive"));
    }

    let profile = lessonhub_service::resolve::resolve_learner(&ctx.learner_repo, learner).await?;
    let full_reference = format!("admin_adjustment:{reference}");
    let granted = ctx
        .credit_service
        .admin_grant(profile.id, credits, &full_reference)
        .await?;

    if granted {
        println!("Granted {credits} credit(s) to learner {}.", profile.id);
    } else {
        println!("Reference '{reference}' was already applied; no change.");
    }
    Ok(())
}
