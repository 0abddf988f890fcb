//! Generation pass.
//!
//! Resolves the names and types of a module, evaluating type expressions at
//! compile time, then walks the body of each function to type-check it and
//! drive an `Emitter`.

mod gen;
mod res;
mod scp;

pub use self::gen::Generator;
pub use self::res::Resolver;
pub use self::scp::Scope;

use crate::model::diag::Report;
use crate::model::sem::Module;
use crate::pass::emit::CEmitter;

/// The failure of a compilation.
#[derive(Debug, thiserror::Error)]
#[error("compilation failed with {errors} error(s)")]
pub struct CompilationFailed {
    /// The number of errors.
    pub errors: usize,
    /// The complete report, errors included.
    pub report: Report,
}

/// Compiles the module to C.
///
/// The `report` holds the diagnostics already produced while building the
/// module, if any; the artifact is only returned if no error was reported,
/// neither while building the module nor while generating.
pub fn compile(module: &Module, mut report: Report) -> Result<String, CompilationFailed> {
    let artifact = Generator::new(module).generate(CEmitter::new(), &mut report);

    if report.has_errors() {
        log::debug!("Compilation failed:\n{}", report);
        return Err(CompilationFailed { errors: report.errors(), report });
    }

    Ok(artifact)
}
