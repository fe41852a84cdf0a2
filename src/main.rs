//! pathproxy - serialize a small XML document into an in-process buffer
//! through a synthetic path, then print what the buffer received.

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use pathproxy::handle::{FileHandle, Handle, MemoryHandle, OpenMode, SpooledHandle};
use pathproxy::xml::Element;
use pathproxy::{Identifier, ProxyConfig, Registry, SchemeTable, SharedHandle};
use std::io::SeekFrom;
use std::sync::Arc;

fn main() -> Result<()> {
    // Initialize logging; RUST_LOG=debug shows registry and proxy activity
    env_logger::init();

    let matches = Command::new("pathproxy")
        .version(pathproxy::VERSION)
        .about("Write an XML document into an already open buffer via a synthetic path")
        .arg(
            Arg::new("message")
                .help("Text content of the <message> element")
                .default_value("hello")
                .index(1),
        )
        .arg(
            Arg::new("id")
                .long("id")
                .help("Identifier to register the buffer under (generated when omitted)"),
        )
        .arg(
            Arg::new("scheme")
                .long("scheme")
                .help("Scheme name for synthetic paths")
                .default_value("wrapper"),
        )
        .arg(
            Arg::new("spooled")
                .long("spooled")
                .help("Use a spooled temp buffer instead of a memory buffer")
                .action(ArgAction::SetTrue)
                .conflicts_with("file"),
        )
        .arg(
            Arg::new("file")
                .long("file")
                .help("Use this real file (created/truncated) as the buffer"),
        )
        .get_matches();

    let config = ProxyConfig {
        scheme: matches
            .get_one::<String>("scheme")
            .cloned()
            .unwrap_or_default(),
        ..ProxyConfig::default()
    };

    let handle: SharedHandle = if let Some(file) = matches.get_one::<String>("file") {
        let mode = OpenMode::parse("w+")?;
        Arc::new(FileHandle::open(file, mode).with_context(|| format!("opening {}", file))?)
    } else if matches.get_flag("spooled") {
        Arc::new(SpooledHandle::new(config.spool_threshold))
    } else {
        Arc::new(MemoryHandle::new())
    };

    let table = Arc::new(SchemeTable::new());
    let registry = Registry::with_config(Arc::clone(&table), config)?;
    let id = matches
        .get_one::<String>("id")
        .map(|id| Identifier::new(id.as_str()))
        .transpose()?;
    let path = registry
        .register_with_path(Arc::clone(&handle), id)?
        .to_string();

    let message = matches
        .get_one::<String>("message")
        .map(String::as_str)
        .unwrap_or("hello");
    let root = Element::new("message")?.text(message);

    // The consumer side only ever sees the path
    let mut stream = table.open(&path, "w")?;
    stream.write(root.to_xml().as_bytes())?;
    stream.flush()?;

    // The owner side reads back through its own handle
    handle.seek(SeekFrom::Start(0))?;
    let size = handle.stat()?.size as usize;
    let written = handle.read(size)?;

    println!("{} -> {}", path, String::from_utf8_lossy(&written));

    stream.close()?;
    Ok(())
}
