//! Patch application boundary and injected logging.
//!
//! The host patching framework owns method discovery, lifecycle and the policy
//! for failed patches; this module is the narrow seam it calls through.
//! [`apply_patch`] borrows one method's instruction stream, runs a
//! caller-supplied rewrite over a private [`StreamEditor`], and returns the
//! fresh stream. Outcomes are reported through an injected [`PatchLog`]
//! capability rather than a process-wide mutable sink, so hosts can route
//! diagnostics wherever they like.

use crate::assembly::Instruction;
use crate::editor::StreamEditor;
use crate::member::MemberRef;
use crate::Result;

/// Logging capability injected into patch application.
///
/// Implementations decide where messages go (host logger, test buffer, ...).
/// The default [`FacadeLog`] forwards to the `log` crate macros.
pub trait PatchLog {
    /// Reports normal progress.
    fn info(&self, message: &str);
    /// Reports a recoverable oddity.
    fn warn(&self, message: &str);
    /// Reports a failure.
    fn error(&self, message: &str);
}

/// [`PatchLog`] implementation forwarding to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct FacadeLog;

impl PatchLog for FacadeLog {
    fn info(&self, message: &str) {
        log::info!("{message}");
    }

    fn warn(&self, message: &str) {
        log::warn!("{message}");
    }

    fn error(&self, message: &str) {
        log::error!("{message}");
    }
}

/// Applies one patch to one method body.
///
/// Constructs a private editor over `instructions`, runs `rewrite` on it, and
/// emits the edited stream. Success and failure are logged with the method's
/// full description; the failure itself is propagated unchanged so the host
/// driver can decide whether to abort module load or continue without this
/// patch — that policy lives outside this crate.
///
/// # Errors
///
/// Propagates whatever the rewrite returns, typically
/// [`crate::Error::PatternNotFound`] when the target method changed shape.
pub fn apply_patch<F>(
    instructions: &[Instruction],
    method: &MemberRef,
    log: &dyn PatchLog,
    rewrite: F,
) -> Result<Vec<Instruction>>
where
    F: FnOnce(&mut StreamEditor) -> Result<()>,
{
    let mut editor = StreamEditor::new(instructions, method);

    match rewrite(&mut editor) {
        Ok(()) => {
            log.info(&format!("Patched {}", method.full_description()));
            Ok(editor.emit_result())
        }
        Err(e) => {
            log.error(&format!(
                "Failed to patch {}: {e}",
                method.full_description()
            ));
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::OpCode;
    use crate::member::{MemberModifiers, TypeRef};
    use crate::pattern::Pattern;
    use crate::Error;
    use std::sync::Mutex;

    /// Captures log lines for assertions.
    #[derive(Default)]
    struct BufferLog {
        lines: Mutex<Vec<(&'static str, String)>>,
    }

    impl PatchLog for BufferLog {
        fn info(&self, message: &str) {
            self.lines.lock().unwrap().push(("info", message.into()));
        }

        fn warn(&self, message: &str) {
            self.lines.lock().unwrap().push(("warn", message.into()));
        }

        fn error(&self, message: &str) {
            self.lines.lock().unwrap().push(("error", message.into()));
        }
    }

    fn method() -> MemberRef {
        MemberRef::method(
            TypeRef::new("Verse.Scene"),
            "OnUpdate",
            vec![],
            TypeRef::new("System.Void"),
            MemberModifiers::PUBLIC,
        )
    }

    #[test]
    fn test_apply_patch_success_logs_and_returns_stream() {
        let log = BufferLog::default();
        let body = vec![Instruction::new(OpCode::Nop), Instruction::new(OpCode::Ret)];
        let pattern = Pattern::exact(&[Instruction::new(OpCode::Nop)]).unwrap();

        let out = apply_patch(&body, &method(), &log, |editor| {
            editor
                .seek_to_start()
                .replace(&pattern, &[Instruction::new(OpCode::Ldnull), Instruction::new(OpCode::Pop)])?;
            Ok(())
        })
        .unwrap();

        assert_eq!(out.len(), 3);

        let lines = log.lines.lock().unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, "info");
        assert!(lines[0].1.contains("Verse.Scene::OnUpdate"));
    }

    #[test]
    fn test_apply_patch_failure_logs_and_propagates() {
        let log = BufferLog::default();
        let body = vec![Instruction::new(OpCode::Ret)];
        let pattern = Pattern::exact(&[Instruction::new(OpCode::Nop)]).unwrap();

        let result = apply_patch(&body, &method(), &log, |editor| {
            editor.replace(&pattern, &[])?;
            Ok(())
        });

        assert!(matches!(result, Err(Error::PatternNotFound { .. })));

        let lines = log.lines.lock().unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, "error");
        assert!(lines[0].1.contains("Pattern not found"));
        assert!(lines[0].1.contains("Verse.Scene::OnUpdate"));
    }
}
