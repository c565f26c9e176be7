use std::io::{Write, stderr, stdout};

/// The process environment commands write to and exit through.
pub trait Host {
    fn output(&mut self) -> impl Write;

    fn error(&mut self) -> impl Write;

    fn exit(&mut self, code: i32);
}

/// Host backed by the real standard streams and process exit.
#[derive(Debug, Clone, Default)]
pub struct StdHost;

impl Host for StdHost {
    fn output(&mut self) -> impl Write {
        stdout()
    }

    fn error(&mut self) -> impl Write {
        stderr()
    }

    fn exit(&mut self, code: i32) {
        std::process::exit(code);
    }
}
