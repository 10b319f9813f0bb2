//! Tracing setup for the CLI and for the in-page script.

#[cfg(feature = "cli")]
use std::path::Path;

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use tracing_appender::non_blocking::WorkerGuard;

/// Install the CLI subscriber.
///
/// Honors `RUST_LOG`; otherwise logs at `warn`, or `debug` when `verbose`.
/// With `log_dir`, events go to a daily-rolling file there instead of stderr.
/// The returned guard must stay alive until exit so buffered lines get flushed.
#[cfg(feature = "cli")]
pub fn init_cli(verbose: bool, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
  use tracing_subscriber::EnvFilter;

  let default_level = if verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  match log_dir {
    Some(dir) => {
      std::fs::create_dir_all(dir).with_context(|| format!("Failed to create log directory {}", dir.display()))?;
      let appender = tracing_appender::rolling::daily(dir, "yt-tab-filter.log");
      let (writer, guard) = tracing_appender::non_blocking(appender);
      tracing_subscriber::fmt().with_env_filter(filter).with_ansi(false).with_writer(writer).init();
      Ok(Some(guard))
    }
    None => {
      tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
      Ok(None)
    }
  }
}

/// Buffers one formatted event and hands it to `console.log` on drop.
#[cfg(target_arch = "wasm32")]
#[derive(Default)]
struct ConsoleWriter(Vec<u8>);

#[cfg(target_arch = "wasm32")]
impl std::io::Write for ConsoleWriter {
  fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
    self.0.extend_from_slice(buf);
    Ok(buf.len())
  }

  fn flush(&mut self) -> std::io::Result<()> {
    Ok(())
  }
}

#[cfg(target_arch = "wasm32")]
impl Drop for ConsoleWriter {
  fn drop(&mut self) {
    let line = String::from_utf8_lossy(&self.0);
    let line = line.trim_end();
    if !line.is_empty() {
      web_sys::console::log_1(&line.into());
    }
  }
}

/// Install the in-page subscriber, writing to the browser console.
///
/// The page has no environment to read a filter from, so the level is fixed
/// at `info`. Timestamps are off: `std::time` is unavailable on wasm32.
#[cfg(target_arch = "wasm32")]
pub fn init_console() {
  let _ = tracing_subscriber::fmt()
    .with_ansi(false)
    .without_time()
    .with_target(false)
    .with_max_level(tracing::Level::INFO)
    .with_writer(ConsoleWriter::default)
    .try_init();
}
