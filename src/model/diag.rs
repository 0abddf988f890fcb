//! Diagnostics.
//!
//! The passes never abort on user errors: they append a `Diagnostic` to the
//! `Report` they are handed, substitute a poisoned placeholder, and carry on.
//!
//! Rendering is left to the caller; the `Display` implementations provide a
//! plain-text rendering.

use std::fmt;

use crate::basic::com::Position;
use crate::model::sem::Type;

/// The severity of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    /// An error: the generated code cannot be trusted.
    Error,
    /// An information, complementing another diagnostic.
    Info,
}

/// The stable identifying code of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Code {
    /// A name is defined twice in the same scope.
    MemberRedefinition,
    /// An integral literal does not fit in `int`.
    IntegerOutOfRange,
    /// A type expression evaluates to something other than a type.
    NotAType,
    /// A name, or attribute, is not defined.
    UndefinedMember,
    /// A compile-time value is expected, but the value is only known at run
    /// time.
    NotAStaticValue,
    /// Two types differ.
    TypesMismatch,
    /// The entry point is missing.
    UndefinedEntryPoint,
    /// The entry point does not have the expected type.
    BadEntryPointType,
    /// A type expression depends on its own definition.
    RecursiveType,
    /// An instruction cannot be evaluated at compile time.
    NotEvaluable,
    /// A call targets a value which is not a function.
    NotCallable,
    /// A call passes the wrong number of arguments.
    ArgumentsCountMismatch,
    /// A variable is bound to a value which cannot be stored at run time.
    NotARuntimeValue,
}

/// A labelled position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Label {
    /// The position.
    pub position: Position,
    /// The message, possibly empty.
    pub message: String,
}

/// A Diagnostic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// The severity.
    pub severity: Severity,
    /// The code.
    pub code: Code,
    /// A short title, shared by all diagnostics of a given code.
    pub title: &'static str,
    /// The labelled positions, the primary one first.
    pub labels: Vec<Label>,
    /// Free-form notes.
    pub notes: Vec<String>,
}

/// A Report, accumulating diagnostics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Report {
    diagnostics: Vec<Diagnostic>,
}

//
//  Public interface of Code
//

impl Code {
    /// Returns the stable identifier of the code, such as "SPP13".
    pub fn id(self) -> &'static str {
        use self::Code::*;

        match self {
            MemberRedefinition => "SPP4",
            IntegerOutOfRange => "SPP11",
            NotAType => "SPP12",
            UndefinedMember => "SPP13",
            NotAStaticValue => "SPP14",
            TypesMismatch => "SPP15",
            UndefinedEntryPoint => "SPP16",
            BadEntryPointType => "SPP17",
            RecursiveType => "SPP18",
            NotEvaluable => "SPP19",
            NotCallable => "SPP20",
            ArgumentsCountMismatch => "SPP21",
            NotARuntimeValue => "SPP22",
        }
    }
}

//
//  Public interface of Diagnostic
//

impl Diagnostic {
    /// Creates an error, without labels nor notes.
    pub fn error(code: Code, title: &'static str) -> Self {
        Diagnostic {
            severity: Severity::Error,
            code,
            title,
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Appends a label.
    pub fn with_label<S: Into<String>>(mut self, position: Position, message: S) -> Self {
        self.labels.push(Label { position, message: message.into() });
        self
    }

    /// Appends a note.
    pub fn with_note<S: Into<String>>(mut self, note: S) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Returns the position of the primary label, if any.
    pub fn position(&self) -> Option<Position> {
        self.labels.first().map(|l| l.position)
    }

    /// A name is defined twice.
    pub fn member_redefinition(name: &str, position: Position, original: Position) -> Self {
        Diagnostic::error(Code::MemberRedefinition, "Member redefinition")
            .with_label(
                position,
                format!("Member \"{}\" is already defined, redefinition is not allowed", name),
            )
            .with_label(original, "Member previously defined here")
    }

    /// An integral literal exceeds the range of `int`.
    pub fn integer_out_of_range(value: u64, position: Position) -> Self {
        Diagnostic::error(Code::IntegerOutOfRange, "Integer out of range")
            .with_label(
                position,
                format!("Literal \"{}\" exceeds the maximum value of \"int\", {}", value, i64::MAX),
            )
    }

    /// A type expression does not evaluate to a type.
    pub fn not_a_type(type_: &Type, position: Position) -> Self {
        Diagnostic::error(Code::NotAType, "Not a type")
            .with_label(
                position,
                format!("Expected static value of type \"type\", got type \"{}\"", type_),
            )
    }

    /// A name is not defined.
    pub fn undefined_member(name: &str, position: Position) -> Self {
        Diagnostic::error(Code::UndefinedMember, "Member not defined")
            .with_label(position, format!("Member \"{}\" is not defined", name))
    }

    /// An attribute is not defined on a value.
    pub fn undefined_attribute(name: &str, type_: &Type, position: Position) -> Self {
        Diagnostic::error(Code::UndefinedMember, "Member not defined")
            .with_label(
                position,
                format!("Member \"{}\" is not defined on type \"{}\"", name, type_),
            )
    }

    /// A value is not known at compile time.
    pub fn not_a_static_value(position: Position) -> Self {
        Diagnostic::error(Code::NotAStaticValue, "Not a static value")
            .with_label(
                position,
                "In this context a static value is expected, but the given one is not",
            )
    }

    /// Two types differ.
    pub fn types_mismatch(
        expected: &Type,
        actual: &Type,
        expected_position: Position,
        actual_position: Position,
    )
        -> Self
    {
        Diagnostic::error(Code::TypesMismatch, "Types mismatch")
            .with_label(
                actual_position,
                format!("Expected type \"{}\", got \"{}\"", expected, actual),
            )
            .with_label(expected_position, format!("Type \"{}\" expected because of this", expected))
    }

    /// The entry point is missing.
    pub fn undefined_entry_point(name: &str) -> Self {
        Diagnostic::error(Code::UndefinedEntryPoint, "Undefined entry point")
            .with_note(format!("Define a function named \"{}\" taking no parameter and returning \"void\"", name))
    }

    /// The entry point has the wrong type.
    pub fn bad_entry_point_type(expected: &Type, actual: &Type, position: Position) -> Self {
        Diagnostic::error(Code::BadEntryPointType, "Bad entry point type")
            .with_label(
                position,
                format!("Expected entry point of type \"{}\", got \"{}\"", expected, actual),
            )
    }

    /// A type expression depends on its own definition.
    pub fn recursive_type(name: &str, position: Position) -> Self {
        Diagnostic::error(Code::RecursiveType, "Recursive type expression")
            .with_label(
                position,
                format!("The type of \"{}\" depends on itself", name),
            )
    }

    /// An instruction cannot be evaluated at compile time.
    pub fn not_evaluable(position: Position) -> Self {
        Diagnostic::error(Code::NotEvaluable, "Not evaluable at compile time")
            .with_label(position, "Only names can be evaluated in a type expression")
    }

    /// A value is called, but is not a function.
    pub fn not_callable(type_: &Type, position: Position) -> Self {
        Diagnostic::error(Code::NotCallable, "Not callable")
            .with_label(position, format!("Expected a function, got type \"{}\"", type_))
    }

    /// A function is called with the wrong number of arguments.
    pub fn arguments_count_mismatch(expected: usize, actual: usize, position: Position) -> Self {
        Diagnostic::error(Code::ArgumentsCountMismatch, "Arguments count mismatch")
            .with_label(
                position,
                format!("Expected {} argument(s), got {}", expected, actual),
            )
    }

    /// A variable is typed `type` or `void`, which cannot be stored.
    pub fn not_a_runtime_value(type_: &Type, position: Position) -> Self {
        Diagnostic::error(Code::NotARuntimeValue, "Not a runtime value")
            .with_label(
                position,
                format!("Values of type \"{}\" cannot be stored in a variable", type_),
            )
    }
}

//
//  Public interface of Report
//

impl Report {
    /// Creates an empty report.
    pub fn new() -> Self { Default::default() }

    /// Appends a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        log::debug!("{} {} at {:?}", diagnostic.code.id(), diagnostic.title, diagnostic.position());
        self.diagnostics.push(diagnostic);
    }

    /// Returns the diagnostics, in order of appearance.
    pub fn diagnostics(&self) -> &[Diagnostic] { &self.diagnostics }

    /// Returns the number of diagnostics of `Error` severity.
    pub fn errors(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Error).count()
    }

    /// Returns whether any diagnostic of `Error` severity was recorded.
    pub fn has_errors(&self) -> bool { self.errors() > 0 }

    /// Returns the codes of the diagnostics, in order of appearance.
    pub fn codes(&self) -> Vec<Code> {
        self.diagnostics.iter().map(|d| d.code).collect()
    }
}

//
//  Trait Implementations
//

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        writeln!(f, "{}[{}]: {}", self.severity, self.code.id(), self.title)?;
        for label in &self.labels {
            if label.message.is_empty() {
                writeln!(f, "  --> {}", label.position)?;
            } else {
                writeln!(f, "  --> {}: {}", label.position, label.message)?;
            }
        }
        for note in &self.notes {
            writeln!(f, "  = note: {}", note)?;
        }
        Ok(())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        for d in &self.diagnostics {
            write!(f, "{}", d)?;
        }
        Ok(())
    }
}
