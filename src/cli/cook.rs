// src/cli/cook.rs - Interactive cooking: start, live timer, stop
//
// Enter stops the current run, Ctrl-C abandons the session (the timer is
// cancelled and no stop request is sent). After a stop the user can cook the
// same dish again; the running total covers every run in this invocation.

use std::io::Write as _;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};

use super::dishes::render_dish;
use crate::backend::DishBackend;
use crate::cooking::session::CookingSession;
use crate::util::format_duration;

/// What interrupted a wait on the user.
enum Input {
    Enter,
    Interrupt,
}

pub async fn run_cook(
    backend: Arc<dyn DishBackend>,
    dish_id: &str,
    quantities: Vec<(String, u64)>,
) -> anyhow::Result<()> {
    let mut session = CookingSession::open(backend, dish_id).await?;
    for (ingredient_id, grams) in &quantities {
        session.set_quantity(ingredient_id, *grams)?;
    }

    eprint!("{}", render_dish(session.dish()));
    if !session.can_start() {
        anyhow::bail!("Cannot start cooking: one or more ingredients are unavailable");
    }
    for issue in session.quantity_issues() {
        eprintln!("  ! {issue}");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let started = tokio::select! {
            r = session.start_cooking() => Some(r),
            _ = tokio::signal::ctrl_c() => None,
        };
        match started {
            Some(result) => result?,
            None => return abandon(session),
        }
        eprintln!(
            "Cooking '{}'. Press Enter to stop, Ctrl-C to abandon.",
            session.dish().name
        );

        // Wait for Enter while rendering the elapsed time; retry stop on failure.
        loop {
            let mut render = tokio::time::interval(Duration::from_secs(1));
            let input = loop {
                tokio::select! {
                    _ = render.tick() => {
                        eprint!("\r  elapsed {:<10}", format_duration(session.elapsed_seconds()));
                        let _ = std::io::stderr().flush();
                    }
                    _ = lines.next_line() => break Input::Enter,
                    _ = tokio::signal::ctrl_c() => break Input::Interrupt,
                }
            };
            eprintln!();
            if let Input::Interrupt = input {
                return abandon(session);
            }

            let stopped = tokio::select! {
                r = session.stop_cooking() => Some(r),
                _ = tokio::signal::ctrl_c() => None,
            };
            match stopped {
                Some(Ok(secs)) => {
                    println!(
                        "Cooked '{}' for {} (total {}).",
                        session.dish().name,
                        format_duration(secs),
                        format_duration(session.total_cooking_seconds())
                    );
                    break;
                }
                Some(Err(e)) => {
                    eprintln!("Failed to stop cooking: {e}. Press Enter to retry.");
                }
                None => return abandon(session),
            }
        }

        if session.is_stale() {
            eprintln!("(stock figures may be out of date)");
        }
        eprint!("{}", render_dish(session.dish()));
        if !session.can_start() {
            return Ok(());
        }
        eprintln!("Press Enter to cook again, or type q to finish.");
        match lines.next_line().await {
            Ok(Some(line)) if !line.trim().eq_ignore_ascii_case("q") => continue,
            _ => return Ok(()),
        }
    }
}

fn abandon(session: CookingSession) -> anyhow::Result<()> {
    eprintln!(
        "\nAbandoned '{}' (state: {}).",
        session.dish().name,
        session.phase()
    );
    session.close();
    Ok(())
}
