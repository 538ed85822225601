//! Subcommand implementations. Each writes its output to `out`.

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use knightpath_core::Square;
use knightpath_jobs::{KnightPathRequest, KnightPathService, ServiceConfig};
use knightpath_paths::{distance_map, shortest_path};
use serde_json::json;

/// `knightpath path <source> <target>`
pub fn path(source: &str, target: &str, as_json: bool, out: &mut impl Write) -> Result<()> {
    let source = Square::parse_normalized(source)?;
    let target = Square::parse_normalized(target)?;
    let result = shortest_path(source, target);

    if as_json {
        let body = json!({
            "starting": source,
            "ending": target,
            "shortestPath": result.path_string(),
            "numberOfMoves": result.distance,
        });
        writeln!(out, "{body}")?;
    } else {
        match result.distance {
            Some(n) => writeln!(out, "{n} moves: {}", result.path_string())?,
            None => writeln!(out, "no path from {source} to {target}")?,
        }
    }
    Ok(())
}

/// `knightpath map <source>`
pub fn map(source: &str, out: &mut impl Write) -> Result<()> {
    let source = Square::parse_normalized(source)?;
    write!(out, "{}", distance_map(source))?;
    Ok(())
}

/// `knightpath batch`: one JSON request per input line, one JSON line out
/// per request, in input order. Rejected lines produce `{"error": ..}`.
pub fn batch(
    config_path: Option<&Path>,
    workers: Option<usize>,
    input: impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    let mut config = match config_path {
        Some(p) => ServiceConfig::load(p)?,
        None => ServiceConfig::default(),
    };
    if let Some(n) = workers {
        config.workers = n;
    }
    config.validate()?;

    let svc = KnightPathService::in_memory(config);
    let pool = svc.spawn_workers().context("cannot start workers")?;

    let mut submitted: Vec<Result<String, String>> = Vec::new();
    for (lineno, line) in input.lines().enumerate() {
        let line = line.context("cannot read input")?;
        if line.trim().is_empty() {
            continue;
        }
        let outcome = serde_json::from_str::<KnightPathRequest>(&line)
            .map_err(|e| format!("line {}: {e}", lineno + 1))
            .and_then(|req| {
                svc.request(req)
                    .map(|acc| acc.operation_id)
                    .map_err(|e| format!("line {}: {e}", lineno + 1))
            });
        if let Err(e) = &outcome {
            log::warn!("rejected request: {e}");
        }
        submitted.push(outcome);
    }

    let stats = pool.shutdown();
    log::info!("batch finished: {} solved, {} failed", stats.processed, stats.failed);

    for outcome in submitted {
        let line = match outcome {
            Ok(id) => match svc.retrieve(&id) {
                Ok(resp) => serde_json::to_value(resp)?,
                Err(e) => json!({ "operationId": id, "error": e.to_string() }),
            },
            Err(e) => json!({ "error": e }),
        };
        writeln!(out, "{line}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn path_text() {
        let s = output(|o| path("a1", "h8", false, o));
        assert_eq!(s, "6 moves: a1:c2:e1:g2:h4:g6:h8\n");
    }

    #[test]
    fn path_json_normalises_input() {
        let s = output(|o| path("A1", "b3", true, o));
        let v: serde_json::Value = serde_json::from_str(&s).unwrap();
        assert_eq!(v["starting"], "a1");
        assert_eq!(v["numberOfMoves"], 1);
        assert_eq!(v["shortestPath"], "a1:b3");
    }

    #[test]
    fn path_rejects_bad_square() {
        let mut buf = Vec::new();
        let err = path("a1", "i9", false, &mut buf).unwrap_err();
        assert!(err.to_string().contains("i9"));
        assert!(buf.is_empty());
    }

    #[test]
    fn map_prints_board() {
        let s = output(|o| map("a1", o));
        assert_eq!(s.lines().count(), 9);
        assert!(s.starts_with("8  5 4 5 4 5 4 5 6\n"));
    }

    #[test]
    fn batch_keeps_input_order() {
        let input = concat!(
            r#"{"source":"a1","target":"h8","operationId":"first"}"#,
            "\n\n",
            r#"{"source":"a1"}"#,
            "\n",
            r#"{"source":"a1","target":"i9"}"#,
            "\n",
            "nonsense\n",
            r#"{"source":"b1","target":"c3","operationId":"last"}"#,
            "\n",
        );
        let s = output(|o| batch(None, Some(2), input.as_bytes(), o));
        let lines: Vec<serde_json::Value> = s.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0]["operationId"], "first");
        assert_eq!(lines[0]["numberOfMoves"], 6);
        assert!(lines[1]["error"].as_str().unwrap().contains("missing target"));
        assert!(lines[2]["error"].as_str().unwrap().contains("i9"));
        assert!(lines[3]["error"].as_str().unwrap().starts_with("line 5"));
        assert_eq!(lines[4]["shortestPath"], "b1:c3");
    }

    #[test]
    fn batch_rejects_zero_workers() {
        let mut buf = Vec::new();
        assert!(batch(None, Some(0), &b""[..], &mut buf).is_err());
    }
}
