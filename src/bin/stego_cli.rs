//! stego-cli: headless encode/decode/capacity for the LSB, DCT, and DWT
//! carriers, plus `auto` detection. Argument parsing is hand-rolled rather
//! than built on an external crate, this binary is a thin driver over the
//! library, not the core surface itself.

use std::env;
use std::fs;
use std::path::Path;
use std::process::ExitCode;

use stego_codec::carrier::{self, CarrierCodec};

fn usage() -> &'static str {
    r#"stego-cli - LSB / DCT-QIM / DWT-QIM steganographic codec

Usage:
  stego-cli encode <lsb|dct|dwt> <cover> <out> <message|@file>
  stego-cli decode <lsb|dct|dwt|auto> <stego>
  stego-cli capacity <lsb|dct|dwt> <cover>

encode: writes <out> containing the framed message. <out>'s extension
        decides the container; omit it to default to PNG.
decode: with a named carrier, fails with a diagnostic if that carrier's
        header doesn't validate. With `auto`, tries LSB, then DCT, then
        DWT, and reports the first carrier that decodes.
capacity: prints the maximum message size (bytes) the cover can hold
          under the named carrier's rules; 0 if the cover is too small.

Exit code 0 on success, 1 on error (diagnostic on stderr).
"#
}

fn init_logging() {
    #[cfg(feature = "cli")]
    {
        let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
            .try_init();
    }
}

fn read_message(arg: &str) -> Result<Vec<u8>, String> {
    if let Some(path) = arg.strip_prefix('@') {
        fs::read(path).map_err(|e| format!("failed to read {path}: {e}"))
    } else {
        Ok(arg.as_bytes().to_vec())
    }
}

fn run_encode(args: &[String]) -> Result<(), String> {
    let [carrier, cover, out, message] = args else {
        return Err("encode requires <carrier> <cover> <out> <message|@file>".to_string());
    };
    let codec = carrier::by_name(carrier).map_err(|e| e.to_string())?;
    let bytes = read_message(message)?;
    codec
        .encode(Path::new(cover), &bytes, Path::new(out))
        .map_err(|e| e.to_string())?;
    println!("wrote {out} ({} carrier, {} bytes)", codec.magic(), bytes.len());
    Ok(())
}

fn run_decode(args: &[String]) -> Result<(), String> {
    let [carrier, stego] = args else {
        return Err("decode requires <lsb|dct|dwt|auto> <stego>".to_string());
    };
    let message = if carrier.eq_ignore_ascii_case("auto") {
        let (tag, message) = carrier::decode_any(Path::new(stego)).map_err(|e| e.to_string())?;
        eprintln!("detected carrier: {tag}");
        message
    } else {
        let codec = carrier::by_name(carrier).map_err(|e| e.to_string())?;
        codec.decode(Path::new(stego)).map_err(|e| e.to_string())?
    };
    match String::from_utf8(message) {
        Ok(text) => println!("{text}"),
        Err(err) => println!("{}", String::from_utf8_lossy(err.as_bytes())),
    }
    Ok(())
}

fn run_capacity(args: &[String]) -> Result<(), String> {
    let [carrier, cover] = args else {
        return Err("capacity requires <lsb|dct|dwt> <cover>".to_string());
    };
    let codec = carrier::by_name(carrier).map_err(|e| e.to_string())?;
    let bytes = codec.capacity(Path::new(cover)).map_err(|e| e.to_string())?;
    println!("{bytes}");
    Ok(())
}

fn main() -> ExitCode {
    init_logging();
    let args: Vec<String> = env::args().skip(1).collect();
    let Some((sub, rest)) = args.split_first() else {
        eprint!("{}", usage());
        return ExitCode::FAILURE;
    };

    let result = match sub.as_str() {
        "encode" => run_encode(rest),
        "decode" => run_decode(rest),
        "capacity" => run_capacity(rest),
        _ => {
            eprint!("{}", usage());
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
