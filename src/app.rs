//! Line-oriented console front-end.
//!
//! # Commands
//!
//! | Input           | Effect                                   |
//! |-----------------|------------------------------------------|
//! | `:v <id>`       | select a conversion variant              |
//! | `:list`         | print all variants                       |
//! | `:clear`        | empty the input                          |
//! | `:open <path>`  | load a file as the input text            |
//! | `:save <path>`  | write the current output to a file       |
//! | `:quit` / `:q`  | leave                                    |
//! | anything else   | becomes the new input text               |
//!
//! [`ConsoleApp`] only writes to the scheduler; output is rendered from the
//! [`SessionSnapshot`]s the scheduler publishes, see [`run_renderer`].

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use tokio::sync::watch;

use crate::scheduler::{ConversionScheduler, SessionSnapshot};
use crate::variant::{self, ConversionVariant};

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// A parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the input text.
    Input(String),
    /// Select the variant with this id.
    Select(String),
    /// Print the variant catalogue.
    List,
    /// Empty the input text.
    Clear,
    /// Replace the input text with a file's contents.
    Open(PathBuf),
    /// Write the current output to a file.
    Save(PathBuf),
    /// Leave the application.
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Command {
        let trimmed = line.trim();
        match trimmed.split_once(char::is_whitespace) {
            Some((":v" | ":variant", id)) => Command::Select(id.trim().to_string()),
            Some((":open", path)) => Command::Open(PathBuf::from(path.trim())),
            Some((":save", path)) => Command::Save(PathBuf::from(path.trim())),
            _ => match trimmed {
                ":list" => Command::List,
                ":clear" => Command::Clear,
                ":quit" | ":q" => Command::Quit,
                _ => Command::Input(line.trim_end_matches(['\r', '\n']).to_string()),
            },
        }
    }
}

/// What the input loop should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Print this message, then continue.
    Message(String),
    Quit,
}

// ---------------------------------------------------------------------------
// ConsoleApp
// ---------------------------------------------------------------------------

/// Console front-end bound to one [`ConversionScheduler`].
pub struct ConsoleApp {
    scheduler: ConversionScheduler,
}

impl ConsoleApp {
    pub fn new(scheduler: ConversionScheduler) -> Self {
        Self { scheduler }
    }

    pub fn scheduler(&self) -> &ConversionScheduler {
        &self.scheduler
    }

    /// Apply one input line.
    pub fn handle_line(&self, line: &str) -> Flow {
        match Command::parse(line) {
            Command::Input(text) => {
                self.scheduler.set_input_text(text);
                Flow::Continue
            }
            Command::Clear => {
                self.scheduler.set_input_text(String::new());
                Flow::Continue
            }
            Command::Select(id) => match variant::lookup(&id) {
                Some(v) => {
                    self.scheduler.set_selected_variant(v.id);
                    Flow::Message(format!("using {}: {}", v.id, v.title()))
                }
                // The scheduler ignores unknown ids on its own; this only
                // tells the user why nothing happened.
                None => Flow::Message(format!("unknown variant {id:?}; try :list")),
            },
            Command::Open(path) => match fs::read_to_string(&path) {
                Ok(text) => {
                    let chars = text.chars().count();
                    self.scheduler.set_input_text(text);
                    Flow::Message(format!("opened {} ({chars} chars)", path.display()))
                }
                Err(e) => Flow::Message(format!("cannot open {}: {e}", path.display())),
            },
            Command::Save(path) => {
                let output = self.scheduler.snapshot().output_text;
                match fs::write(&path, &output) {
                    Ok(()) => Flow::Message(format!(
                        "saved {} chars to {}",
                        output.chars().count(),
                        path.display()
                    )),
                    Err(e) => Flow::Message(format!("cannot save {}: {e}", path.display())),
                }
            }
            Command::List => Flow::Message(render_variant_list(self.scheduler.selected_variant())),
            Command::Quit => Flow::Quit,
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// One status line for a snapshot, e.g. `[s2t 2→2] 漢字` or
/// `[s2t 2→0 …] ` while busy.  Counts are input and output characters.
pub fn render_snapshot(snapshot: &SessionSnapshot) -> String {
    let busy = if snapshot.is_busy { " …" } else { "" };
    format!(
        "[{} {}→{}{busy}] {}",
        snapshot.selected_variant_id,
        snapshot.input_text.chars().count(),
        snapshot.output_text.chars().count(),
        snapshot.output_text
    )
}

/// Write a status line to `out` whenever the output, busy flag or variant
/// changes.
///
/// Returns `Ok` once the scheduler is gone, or the first write error (a
/// closed stdout, for example).
pub async fn run_renderer<W: Write>(
    mut changes: watch::Receiver<SessionSnapshot>,
    mut out: W,
) -> io::Result<()> {
    let mut last: Option<(String, bool, &'static str)> = None;

    while changes.changed().await.is_ok() {
        let snapshot = changes.borrow_and_update().clone();
        let key = (
            snapshot.output_text.clone(),
            snapshot.is_busy,
            snapshot.selected_variant_id,
        );
        if last.as_ref() == Some(&key) {
            continue;
        }
        last = Some(key);

        writeln!(out, "{}", render_snapshot(&snapshot))?;
        out.flush()?;
    }
    Ok(())
}

/// The catalogue, one variant per line, current selection marked with `*`.
pub fn render_variant_list(selected: &ConversionVariant) -> String {
    variant::list()
        .iter()
        .map(|v| {
            let mark = if v.id == selected.id { '*' } else { ' ' };
            let idiom = if v.idiom_aware { " (idioms)" } else { "" };
            format!("{mark} {:<6} {}{idiom}", v.id, v.title())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::config::SchedulerConfig;
    use crate::convert::{ConvertError, Converter, LogSink};

    struct UpperConverter;

    #[async_trait]
    impl Converter for UpperConverter {
        async fn convert(&self, variant_id: &str, text: &str) -> Result<String, ConvertError> {
            Ok(format!("{variant_id}:{}", text.to_uppercase()))
        }
    }

    fn make_app() -> ConsoleApp {
        let scheduler = ConversionScheduler::new(
            Arc::new(UpperConverter),
            Arc::new(LogSink),
            SchedulerConfig::default(),
            "s2t",
        )
        .unwrap();
        ConsoleApp::new(scheduler)
    }

    #[test]
    fn parse_commands() {
        assert_eq!(Command::parse(":v s2tw"), Command::Select("s2tw".into()));
        assert_eq!(Command::parse(":variant  hk2s "), Command::Select("hk2s".into()));
        assert_eq!(Command::parse(":list"), Command::List);
        assert_eq!(Command::parse(":clear"), Command::Clear);
        assert_eq!(Command::parse(":q"), Command::Quit);
        assert_eq!(Command::parse(":quit\n"), Command::Quit);
        assert_eq!(
            Command::parse(":open  notes/in.txt "),
            Command::Open(PathBuf::from("notes/in.txt"))
        );
        assert_eq!(
            Command::parse(":save out.txt"),
            Command::Save(PathBuf::from("out.txt"))
        );
    }

    #[test]
    fn anything_else_is_input() {
        assert_eq!(Command::parse("汉字\n"), Command::Input("汉字".into()));
        assert_eq!(Command::parse("  缩进"), Command::Input("  缩进".into()));
        assert_eq!(Command::parse(":v"), Command::Input(":v".into()));
        assert_eq!(Command::parse(""), Command::Input(String::new()));
    }

    #[test]
    fn render_marks_busy() {
        let mut snap = SessionSnapshot {
            input_text: "汉字".into(),
            output_text: "漢字".into(),
            is_busy: false,
            selected_variant_id: "s2t",
        };
        assert_eq!(render_snapshot(&snap), "[s2t 2→2] 漢字");

        snap.is_busy = true;
        assert_eq!(render_snapshot(&snap), "[s2t 2→2 …] 漢字");
    }

    #[test]
    fn variant_list_marks_selection() {
        let list = render_variant_list(variant::lookup("s2twp").unwrap());
        let lines: Vec<_> = list.lines().collect();

        assert_eq!(lines.len(), 14);
        assert!(lines[0].starts_with("  s2t "));
        assert!(lines[4].starts_with("* s2twp"));
        assert!(lines[4].ends_with("(idioms)"));
    }

    #[tokio::test(start_paused = true)]
    async fn lines_drive_the_scheduler() {
        let app = make_app();

        assert_eq!(app.handle_line("abc"), Flow::Continue);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(app.scheduler().snapshot().output_text, "s2t:ABC");

        assert!(matches!(app.handle_line(":v t2s"), Flow::Message(_)));
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(app.scheduler().snapshot().output_text, "t2s:ABC");

        assert_eq!(app.handle_line(":clear"), Flow::Continue);
        assert!(app.scheduler().snapshot().output_text.is_empty());

        assert_eq!(app.handle_line(":q"), Flow::Quit);
    }

    #[tokio::test]
    async fn unknown_variant_reports_and_keeps_selection() {
        let app = make_app();

        match app.handle_line(":v bogus") {
            Flow::Message(msg) => assert!(msg.contains("unknown variant")),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(app.scheduler().selected_variant().id, "s2t");
    }

    #[tokio::test(start_paused = true)]
    async fn open_and_save_round_trip_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.txt");
        let output = dir.path().join("out.txt");
        std::fs::write(&input, "first line\nsecond").unwrap();
        let app = make_app();

        match app.handle_line(&format!(":open {}", input.display())) {
            Flow::Message(msg) => assert!(msg.contains("17 chars"), "{msg}"),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(app.scheduler().snapshot().input_text, "first line\nsecond");

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(matches!(
            app.handle_line(&format!(":save {}", output.display())),
            Flow::Message(_)
        ));
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "s2t:FIRST LINE\nSECOND"
        );
    }

    #[tokio::test]
    async fn missing_file_is_reported_and_input_kept() {
        let dir = tempfile::tempdir().unwrap();
        let app = make_app();
        app.handle_line("abc");

        match app.handle_line(&format!(":open {}", dir.path().join("nope.txt").display())) {
            Flow::Message(msg) => assert!(msg.starts_with("cannot open"), "{msg}"),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(app.scheduler().snapshot().input_text, "abc");
    }

    // -----------------------------------------------------------------------
    // Renderer
    // -----------------------------------------------------------------------

    /// Collects rendered output so the test can read it while the renderer
    /// still owns the writer.
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<std::sync::Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Behaves like stdout after the reading end of a pipe went away.
    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::ErrorKind::BrokenPipe.into())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn renderer_prints_converted_output_and_ends_with_scheduler() {
        let app = make_app();
        let buf = SharedBuf::default();
        let renderer = tokio::spawn(run_renderer(app.scheduler().subscribe(), buf.clone()));

        app.handle_line("abc");
        tokio::time::sleep(Duration::from_millis(20)).await;
        drop(app);

        let result = tokio::time::timeout(Duration::from_secs(1), renderer)
            .await
            .expect("renderer ends once the scheduler is dropped")
            .unwrap();
        assert!(result.is_ok());

        let printed = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert!(printed.lines().any(|l| l == "[s2t 3→7] s2t:ABC"), "{printed}");
    }

    #[tokio::test(start_paused = true)]
    async fn renderer_stops_on_write_error() {
        let app = make_app();
        let renderer = tokio::spawn(run_renderer(app.scheduler().subscribe(), BrokenPipe));

        app.handle_line("abc");
        let result = tokio::time::timeout(Duration::from_secs(1), renderer)
            .await
            .expect("renderer gives up instead of looping")
            .unwrap();

        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(app.handle_line(":q"), Flow::Quit);
    }
}
