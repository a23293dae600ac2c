use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use mpcdi_engine::registry::FormatRegistry;
use mpcdi_engine::scene::{AttrValue, SceneDocument, XformOp};

const SNAPSHOT_DECIMALS: usize = 6;

const USAGE: &str = r#"mpcdi_cli (mpcdi-engine)

USAGE:
  mpcdi_cli convert <file.xml> [options]
  mpcdi_cli formats

OPTIONS (convert):
  --snap <path>      Write the scene snapshot to this file instead of stdout
  --overwrite        Overwrite an existing snapshot file
  -h, --help         Show this help
"#;

fn main() {
    env_logger::init();

    if let Err(err) = run() {
        eprintln!("mpcdi_cli error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut args = Args::new(args);

    let Some(command) = args.next() else {
        print_usage();
        return Ok(());
    };

    match command.as_str() {
        "convert" => cmd_convert(&mut args),
        "formats" => {
            for id in FormatRegistry::global().ids() {
                println!("{id}");
            }
            Ok(())
        }
        "-h" | "--help" | "help" => {
            print_usage();
            Ok(())
        }
        other => Err(format!("unknown command `{other}`\n\n{USAGE}")),
    }
}

fn print_usage() {
    println!("{USAGE}");
}

fn cmd_convert(args: &mut Args) -> Result<(), String> {
    let input = args.next().ok_or("missing input file")?;

    let mut snap_path: Option<PathBuf> = None;
    let mut overwrite = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--snap" => snap_path = Some(PathBuf::from(args.value("--snap")?)),
            "--overwrite" => overwrite = true,
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
        }
    }

    let format = FormatRegistry::global()
        .create("mpcdiFileFormat")
        .ok_or("mpcdi file format is not registered")?;

    let path = Path::new(&input);
    if !format.can_read(path) {
        return Err(format!("format cannot read `{input}`"));
    }

    let mut document = SceneDocument::new();
    format.read(&mut document, path).map_err(|e| e.to_string())?;

    let snapshot = scene_snapshot(&document);
    if let Some(path) = snap_path.as_deref() {
        write_text_file(path, &snapshot, overwrite)?;
        eprintln!("wrote {}", path.display());
    } else {
        print!("{snapshot}");
    }

    eprintln!("{input}: {} nodes", document.node_count());
    Ok(())
}

fn scene_snapshot(document: &SceneDocument) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# mpcdi-engine scene v1");
    let _ = writeln!(out, "nodes {}", document.node_count());
    if let Some(default_node) = document.default_node() {
        let _ = writeln!(out, "default {default_node}");
    }

    for node in document.nodes() {
        let _ = writeln!(out, "node {} {}", node.kind().name(), node.path());
        for op in node.ops() {
            write_op(&mut out, op);
        }
        for (name, value) in node.attrs() {
            match value {
                AttrValue::Float(number) => {
                    let _ = write!(out, "  attr {name} ");
                    write_f32(&mut out, number);
                    out.push('\n');
                }
                AttrValue::Bool(flag) => {
                    let _ = writeln!(out, "  attr {name} {flag}");
                }
            }
        }
    }

    normalize_snapshot_text(&out)
}

fn write_op(out: &mut String, op: &XformOp) {
    match op {
        XformOp::Translate(None) => {
            let _ = writeln!(out, "  op translate (unset)");
        }
        XformOp::Translate(Some(value)) => {
            let _ = write!(out, "  op translate");
            for component in value.to_array() {
                out.push(' ');
                write_f32(out, component);
            }
            out.push('\n');
        }
        XformOp::RotateX(degrees) => {
            let _ = write!(out, "  op rotateX ");
            write_f32(out, *degrees);
            out.push('\n');
        }
        XformOp::RotateY(degrees) => {
            let _ = write!(out, "  op rotateY ");
            write_f32(out, *degrees);
            out.push('\n');
        }
        XformOp::RotateZ(degrees) => {
            let _ = write!(out, "  op rotateZ ");
            write_f32(out, *degrees);
            out.push('\n');
        }
        XformOp::Scale(value) => {
            let _ = write!(out, "  op scale");
            for component in value.to_array() {
                out.push(' ');
                write_f32(out, component);
            }
            out.push('\n');
        }
    }
}

fn write_f32(out: &mut String, value: f32) {
    let value = if value == 0.0 { 0.0 } else { value };
    let _ = write!(out, "{value:.SNAPSHOT_DECIMALS$}");
}

fn normalize_snapshot_text(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n");
    if normalized.ends_with('\n') {
        normalized
    } else {
        format!("{normalized}\n")
    }
}

fn write_text_file(path: &Path, text: &str, overwrite: bool) -> Result<(), String> {
    if path.exists() && !overwrite {
        return Err(format!(
            "refusing to overwrite existing file {} (use --overwrite)",
            path.display()
        ));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| format!("create dir {}: {e}", parent.display()))?;
    }
    fs::write(path, text).map_err(|e| format!("write {}: {e}", path.display()))
}

struct Args {
    args: Vec<String>,
    pos: usize,
}

impl Args {
    fn new(args: Vec<String>) -> Self {
        Self { args, pos: 0 }
    }

    fn next(&mut self) -> Option<String> {
        let arg = self.args.get(self.pos)?.clone();
        self.pos += 1;
        Some(arg)
    }

    fn value(&mut self, flag: &str) -> Result<String, String> {
        self.next()
            .ok_or_else(|| format!("missing value for {flag}"))
    }
}
