use std::process::ExitCode;

use mahjong_tai::{Exposed, Hand, TileError, WinShape, score, winning_shape, winning_tiles};
use serde::Serialize;

const USAGE: &str = "Usage: mahjong-tai <concealed> [--exposed <groups>] [--self-drawn] [--remaining <n>] [--check]

  <concealed>         tiles separated by ',' (e.g. one,one,two,three,four,...)
  --exposed <groups>  melds separated by ';', tiles by ',' (e.g. e,e,e;two,three,four)
  --self-drawn        the winning tile came from the player's own draw
  --remaining <n>     tiles left in the draw pile (default 20)
  --check             report shape and waiting tiles instead of a score
  --version           print the build commit";

/// Command-line options
struct Options {
    concealed: String,
    exposed: String,
    self_drawn: bool,
    remaining: usize,
    check: bool,
}

/// Output of `--check`
#[derive(Serialize)]
struct CheckReport {
    winning: bool,
    shape: Option<WinShape>,
    waiting: Vec<String>,
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut concealed = None;
    let mut options = Options {
        concealed: String::new(),
        exposed: String::new(),
        self_drawn: false,
        remaining: 20,
        check: false,
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--exposed" => {
                options.exposed = iter
                    .next()
                    .ok_or("--exposed needs a value")?
                    .clone();
            }
            "--remaining" => {
                let value = iter.next().ok_or("--remaining needs a value")?;
                options.remaining = value
                    .parse()
                    .map_err(|_| format!("Invalid remaining count: {}", value))?;
            }
            "--self-drawn" => options.self_drawn = true,
            "--check" => options.check = true,
            flag if flag.starts_with("--") => return Err(format!("Unknown option: {}", flag)),
            tiles => {
                if concealed.replace(tiles.to_string()).is_some() {
                    return Err("Only one concealed hand may be given".to_string());
                }
            }
        }
    }

    options.concealed = concealed.ok_or("Missing concealed tiles")?;
    Ok(options)
}

fn run(options: &Options) -> Result<String, TileError> {
    let exposed = Exposed::from_string(&options.exposed)?;
    let concealed = Hand::from_string(&options.concealed)?;

    let json = if options.check {
        let meld_count = exposed.meld_count();
        let shape = winning_shape(&concealed, meld_count);
        let report = CheckReport {
            winning: shape.is_some(),
            shape,
            waiting: winning_tiles(&concealed, &exposed)
                .iter()
                .map(|t| t.to_string())
                .collect(),
        };
        serde_json::to_string_pretty(&report)
    } else {
        let record = score(&exposed, &concealed, options.self_drawn, options.remaining);
        serde_json::to_string_pretty(&record)
    };

    Ok(json.unwrap_or_else(|e| format!(r#"{{"error":"Serialization error: {}"}}"#, e)))
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "--version") {
        println!("mahjong-tai {} ({})", env!("CARGO_PKG_VERSION"), env!("BUILD_COMMIT"));
        return ExitCode::SUCCESS;
    }
    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        println!("{}", USAGE);
        return ExitCode::SUCCESS;
    }

    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("ERROR: {}\n\n{}", e, USAGE);
            return ExitCode::from(2);
        }
    };

    match run(&options) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("ERROR: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mahjong_tai::Tile;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args_defaults() {
        let options = parse_args(&args(&["one,one"])).unwrap();
        assert_eq!(options.concealed, "one,one");
        assert_eq!(options.exposed, "");
        assert!(!options.self_drawn);
        assert_eq!(options.remaining, 20);
        assert!(!options.check);
    }

    #[test]
    fn test_parse_args_flags() {
        let options = parse_args(&args(&[
            "--exposed",
            "e,e,e",
            "s,s",
            "--self-drawn",
            "--remaining",
            "0",
            "--check",
        ]))
        .unwrap();
        assert_eq!(options.exposed, "e,e,e");
        assert_eq!(options.concealed, "s,s");
        assert!(options.self_drawn);
        assert_eq!(options.remaining, 0);
        assert!(options.check);
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(parse_args(&args(&[])).is_err());
        assert!(parse_args(&args(&["one", "two"])).is_err());
        assert!(parse_args(&args(&["one", "--remaining", "lots"])).is_err());
        assert!(parse_args(&args(&["one", "--exposed"])).is_err());
        assert!(parse_args(&args(&["one", "--fast"])).is_err());
    }

    #[test]
    fn test_run_reports_unknown_tile() {
        let options = parse_args(&args(&["one,two,joker"])).unwrap();
        assert_eq!(
            run(&options),
            Err(TileError::UnknownToken("joker".to_string()))
        );
    }

    #[test]
    fn test_run_scores_hand() {
        let options = parse_args(&args(&["e,e,s,s,w,w,n,n,m,m,b,b,f,f"])).unwrap();
        let json = run(&options).unwrap();
        assert!(json.contains("seven_honor_pairs"));
        assert!(json.contains("\"total\": 88"));
    }

    #[test]
    fn test_run_check_ignores_exhausted_waits() {
        let options = parse_args(&args(&[
            "one,two,three,four,five,six,e",
            "--exposed",
            "e,e,e;m,m,m",
            "--check",
        ]))
        .unwrap();
        let json = run(&options).unwrap();
        assert!(json.contains("\"winning\": false"));
        assert!(json.contains("\"waiting\": []"));
    }

    #[test]
    fn test_run_reports_too_many_copies() {
        let tokens = vec!["n"; 300].join(",");
        let options = parse_args(&args(&[tokens.as_str()])).unwrap();
        assert_eq!(run(&options), Err(TileError::TooManyCopies(Tile::NORTH)));
    }
}
