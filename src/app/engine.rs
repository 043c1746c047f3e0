//! Batch pipeline engine.
//!
//! Items run one at a time through extraction, enhancement, optional
//! smoothing and recombination. Failures never escape [`execute`]; they are
//! collected in the returned [`RunReport`] and the error policy decides whether
//! the run goes on.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::domain::pipeline::{
    Destination, ErrorPolicy, FileItem, ItemFailure, ItemOutput, OutputPolicy, OutputTarget,
    RunReport, StagePlan, resolve_output, unique_buffer_name,
};
use crate::domain::{AppError, ItemError};
use crate::ports::{Confirmation, Confirmer, ImageWorkspace, StageOperators};

use super::AppContext;

/// Base name probed for the per-item working copy.
const WORKING_BUFFER: &str = "target";

/// Run every item and report the outcome.
pub fn execute<W, O, C>(
    ctx: &mut AppContext<W, O, C>,
    items: &[FileItem],
    plan: &StagePlan,
    policy: &OutputPolicy,
) -> RunReport
where
    W: ImageWorkspace,
    O: StageOperators<W>,
    C: Confirmer,
{
    let (workspace, operators, confirmer) = ctx.parts_mut();
    let mut report = RunReport::default();

    for (index, item) in items.iter().enumerate() {
        info!(item = %item, position = index + 1, total = items.len(), "processing");
        report.processed_count += 1;

        match process_item(workspace, operators, confirmer, item, plan, policy) {
            Ok(destination) => {
                info!(item = %item, destination = %destination, "done");
                report.outputs.push(ItemOutput { item: item.clone(), destination });
            }
            Err(error) => {
                warn!(item = %item, error = %error, "item failed");
                report.errors.push(ItemFailure { item: item.clone(), error: error.clone() });

                let remaining = items.len() - index - 1;
                if remaining > 0 && !should_continue(confirmer, policy.error_policy, item, &error)
                {
                    info!(skipped = remaining, "run stopped");
                    report.aborted = true;
                    break;
                }
            }
        }
    }

    report
}

fn should_continue<C: Confirmer>(
    confirmer: &mut C,
    policy: ErrorPolicy,
    item: &FileItem,
    error: &ItemError,
) -> bool {
    match policy {
        ErrorPolicy::Continue => true,
        ErrorPolicy::Abort => false,
        ErrorPolicy::Ask => {
            let question = format!("{item} failed: {error}\nContinue with the remaining files?");
            ask(confirmer, &question) == Confirmation::Yes
        }
    }
}

/// Prompt failures count as `No`.
fn ask<C: Confirmer>(confirmer: &mut C, question: &str) -> Confirmation {
    confirmer.confirm(question).unwrap_or_else(|err| {
        warn!(error = %err, "confirmation failed, treating as no");
        Confirmation::No
    })
}

fn process_item<W, O, C>(
    workspace: &mut W,
    operators: &O,
    confirmer: &mut C,
    item: &FileItem,
    plan: &StagePlan,
    policy: &OutputPolicy,
) -> Result<Destination, ItemError>
where
    W: ImageWorkspace,
    O: StageOperators<W>,
    C: Confirmer,
{
    let mut scope = BufferScope::new(workspace);

    let (source, destination) = match item {
        FileItem::File(path) => {
            let output = destination_for(confirmer, path, policy)?;
            let source = scope.workspace().open_file(path).map_err(|err| resolve_error(item, err))?;
            scope.adopt(&source);
            (source, Destination::File(output))
        }
        FileItem::Buffer(name) => {
            if !scope.workspace().has_buffer(name) {
                return Err(ItemError::Resolve {
                    item: item.to_string(),
                    details: format!("no buffer named '{name}' is open"),
                });
            }
            (name.clone(), Destination::Buffer(name.clone()))
        }
    };

    let working = {
        let workspace = scope.workspace();
        unique_buffer_name(WORKING_BUFFER, |name| workspace.has_buffer(name))
    };
    scope.workspace().duplicate(&source, &working).map_err(stage_error("duplicate"))?;
    scope.adopt(&working);

    let extraction = operators
        .extract_component(scope.workspace(), &working, &plan.extraction)
        .map_err(stage_error("extraction"))?;
    scope.adopt(&extraction.component);
    scope.adopt(&extraction.residual);
    scope.require("extraction", &extraction.component)?;
    scope.require("extraction", &extraction.residual)?;

    operators
        .enhance(scope.workspace(), &extraction.component, &plan.enhancement)
        .map_err(stage_error("enhancement"))?;

    if let Some(smoothing) = &plan.smoothing {
        operators
            .smooth(scope.workspace(), &extraction.component, smoothing)
            .map_err(stage_error("smoothing"))?;
    }

    operators
        .blend(scope.workspace(), &extraction.residual, &extraction.component)
        .map_err(stage_error("blend"))?;
    scope.require("blend", &extraction.residual)?;
    scope
        .workspace()
        .assign(&extraction.residual, &source)
        .map_err(stage_error("recombine"))?;

    if let Destination::File(path) = &destination {
        scope.workspace().save(&source, path, policy.file_type).map_err(|err| {
            ItemError::Persist { path: path.clone(), details: err.to_string() }
        })?;
    }

    Ok(destination)
}

/// Output path for a file item, settling conflicts before any stage runs.
fn destination_for<C: Confirmer>(
    confirmer: &mut C,
    input: &Path,
    policy: &OutputPolicy,
) -> Result<PathBuf, ItemError> {
    match resolve_output(input, policy, Path::exists) {
        OutputTarget::Clear(path) => Ok(path),
        OutputTarget::Conflict(path) => {
            let overwrite = policy.error_policy == ErrorPolicy::Ask
                && ask(
                    confirmer,
                    &format!("The file '{}' already exists. Overwrite it?", path.display()),
                ) == Confirmation::Yes;
            if overwrite { Ok(path) } else { Err(ItemError::PathConflict(path)) }
        }
    }
}

fn resolve_error(item: &FileItem, err: AppError) -> ItemError {
    ItemError::Resolve { item: item.to_string(), details: err.to_string() }
}

fn stage_error(stage: &'static str) -> impl Fn(AppError) -> ItemError {
    move |err| ItemError::StageExecution { stage, details: err.to_string() }
}

/// Buffers created for one item, closed when the scope ends.
struct BufferScope<'a, W: ImageWorkspace> {
    workspace: &'a mut W,
    owned: Vec<String>,
}

impl<'a, W: ImageWorkspace> BufferScope<'a, W> {
    fn new(workspace: &'a mut W) -> Self {
        Self { workspace, owned: Vec::new() }
    }

    fn workspace(&mut self) -> &mut W {
        self.workspace
    }

    fn adopt(&mut self, name: &str) {
        if !self.owned.iter().any(|owned| owned == name) {
            self.owned.push(name.to_string());
        }
    }

    /// Fail `stage` when it reported a buffer the session does not hold.
    fn require(&self, stage: &'static str, name: &str) -> Result<(), ItemError> {
        if self.workspace.has_buffer(name) {
            Ok(())
        } else {
            Err(ItemError::StageExecution {
                stage,
                details: format!("no buffer named '{name}' was produced"),
            })
        }
    }
}

impl<W: ImageWorkspace> Drop for BufferScope<'_, W> {
    fn drop(&mut self) {
        for name in self.owned.drain(..).rev() {
            if !self.workspace.has_buffer(&name) {
                continue;
            }
            if let Err(err) = self.workspace.close(&name) {
                warn!(buffer = %name, error = %err, "failed to release buffer");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pipeline::{EnhancementParams, ExtractionOptions, FileType, SmoothingParams};
    use crate::testing::{FakeOperators, FakeWorkspace, ScriptedConfirmer};
    use assert_fs::prelude::*;

    type TestContext = AppContext<FakeWorkspace, FakeOperators, ScriptedConfirmer>;

    fn context(operators: FakeOperators, answers: &[Confirmation]) -> TestContext {
        AppContext::new(FakeWorkspace::new(), operators, ScriptedConfirmer::new(answers))
    }

    fn plan() -> StagePlan {
        StagePlan {
            extraction: ExtractionOptions::default(),
            enhancement: EnhancementParams { sharpen: 0.2, halo_adjust: 0.1 },
            smoothing: None,
        }
    }

    fn policy(error_policy: ErrorPolicy) -> OutputPolicy {
        OutputPolicy { error_policy, overwrite: false, ..OutputPolicy::default() }
    }

    fn buffers(names: &[&str]) -> Vec<FileItem> {
        names.iter().map(|name| FileItem::Buffer(name.to_string())).collect()
    }

    fn open_all(ctx: &mut TestContext, names: &[&str]) {
        for name in names {
            ctx.workspace_mut().insert(name, name);
        }
    }

    #[test]
    fn continue_policy_processes_remaining_items() {
        let mut ctx = context(FakeOperators::failing_extraction_on("b"), &[]);
        open_all(&mut ctx, &["a", "b", "c"]);

        let report = execute(&mut ctx, &buffers(&["a", "b", "c"]), &plan(), &policy(ErrorPolicy::Continue));
        assert_eq!(report.processed_count, 3);
        assert_eq!(report.outputs.len(), 2);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].item, FileItem::Buffer("b".to_string()));
        assert!(!report.aborted);
    }

    #[test]
    fn abort_policy_stops_after_first_failure() {
        let mut ctx = context(FakeOperators::failing_extraction_on("b"), &[]);
        open_all(&mut ctx, &["a", "b", "c"]);

        let report = execute(&mut ctx, &buffers(&["a", "b", "c"]), &plan(), &policy(ErrorPolicy::Abort));
        assert_eq!(report.processed_count, 2);
        assert_eq!(report.errors.len(), 1);
        assert!(report.aborted);
        assert_eq!(ctx.workspace().content("c"), Some("c".to_string()));
    }

    #[test]
    fn ask_policy_follows_the_answer() {
        let mut ctx = context(FakeOperators::failing_extraction_on("a"), &[Confirmation::Yes]);
        open_all(&mut ctx, &["a", "b", "c"]);
        let report = execute(&mut ctx, &buffers(&["a", "b", "c"]), &plan(), &policy(ErrorPolicy::Ask));
        assert_eq!(report.outputs.len(), 2);
        assert!(!report.aborted);

        let mut ctx = context(FakeOperators::failing_extraction_on("a"), &[Confirmation::No]);
        open_all(&mut ctx, &["a", "b", "c"]);
        let report = execute(&mut ctx, &buffers(&["a", "b", "c"]), &plan(), &policy(ErrorPolicy::Ask));
        assert!(report.outputs.is_empty());
        assert!(report.aborted);
        assert_eq!(ctx.confirmer_mut().questions().len(), 1);
    }

    #[test]
    fn failing_last_item_does_not_ask() {
        let mut ctx = context(FakeOperators::failing_extraction_on("b"), &[]);
        open_all(&mut ctx, &["a", "b"]);
        let report = execute(&mut ctx, &buffers(&["a", "b"]), &plan(), &policy(ErrorPolicy::Ask));
        assert_eq!(report.errors.len(), 1);
        assert!(!report.aborted);
        assert!(ctx.confirmer_mut().questions().is_empty());
    }

    #[test]
    fn buffer_items_are_modified_in_place() {
        let mut ctx = context(FakeOperators::new(), &[]);
        open_all(&mut ctx, &["M42"]);

        let report = execute(&mut ctx, &buffers(&["M42"]), &plan(), &policy(ErrorPolicy::Abort));
        assert!(report.is_success());
        assert_eq!(report.outputs[0].destination, Destination::Buffer("M42".to_string()));
        assert_eq!(
            ctx.workspace().content("M42"),
            Some("blend(residual(M42), enhance(component(M42)))".to_string())
        );
        assert_eq!(ctx.workspace().buffer_names(), vec!["M42".to_string()]);
    }

    #[test]
    fn intermediates_are_released_when_a_stage_fails() {
        let mut ctx = context(FakeOperators::failing_enhancement(), &[]);
        open_all(&mut ctx, &["M42"]);

        let report = execute(&mut ctx, &buffers(&["M42"]), &plan(), &policy(ErrorPolicy::Continue));
        assert!(matches!(
            report.errors[0].error,
            ItemError::StageExecution { stage: "enhancement", .. }
        ));
        assert_eq!(ctx.workspace().buffer_names(), vec!["M42".to_string()]);
        assert_eq!(ctx.workspace().content("M42"), Some("M42".to_string()));
    }

    #[test]
    fn working_buffer_name_avoids_open_buffers() {
        let mut ctx = context(FakeOperators::new(), &[]);
        open_all(&mut ctx, &["target", "target2", "M42"]);

        execute(&mut ctx, &buffers(&["M42"]), &plan(), &policy(ErrorPolicy::Abort));
        assert!(ctx.workspace().created().contains(&"target3".to_string()));
        assert_eq!(ctx.workspace().content("target"), Some("target".to_string()));
    }

    #[test]
    fn phantom_extraction_output_is_a_stage_error() {
        let mut ctx = context(FakeOperators::phantom_component(), &[]);
        open_all(&mut ctx, &["M42"]);

        let report = execute(&mut ctx, &buffers(&["M42"]), &plan(), &policy(ErrorPolicy::Continue));
        assert!(matches!(
            report.errors[0].error,
            ItemError::StageExecution { stage: "extraction", .. }
        ));
        assert_eq!(ctx.workspace().buffer_names(), vec!["M42".to_string()]);
    }

    #[test]
    fn smoothing_runs_only_when_planned() {
        let mut ctx = context(FakeOperators::new(), &[]);
        open_all(&mut ctx, &["M42"]);
        let mut plan = plan();
        plan.smoothing = Some(SmoothingParams { psf_size: 1.0, psf_shape: 2.0 });

        execute(&mut ctx, &buffers(&["M42"]), &plan, &policy(ErrorPolicy::Abort));
        assert_eq!(
            ctx.workspace().content("M42"),
            Some("blend(residual(M42), smooth(enhance(component(M42))))".to_string())
        );
    }

    #[test]
    fn missing_buffer_is_a_resolve_error() {
        let mut ctx = context(FakeOperators::new(), &[]);
        let report = execute(&mut ctx, &buffers(&["gone"]), &plan(), &policy(ErrorPolicy::Continue));
        assert!(matches!(report.errors[0].error, ItemError::Resolve { .. }));
    }

    #[test]
    fn file_items_are_saved_and_released() {
        let temp = assert_fs::TempDir::new().unwrap();
        let input = temp.child("m31.fits");
        input.write_str("raw").unwrap();
        let mut ctx = context(FakeOperators::new(), &[]);
        let policy = OutputPolicy { file_type: FileType::Xisf, ..policy(ErrorPolicy::Abort) };

        let items = vec![FileItem::File(input.path().to_path_buf())];
        let report = execute(&mut ctx, &items, &plan(), &policy);

        let expected = temp.path().join("m31_corrected.xisf");
        assert_eq!(report.outputs[0].destination, Destination::File(expected.clone()));
        assert_eq!(ctx.workspace().saved(), vec![(expected, FileType::Xisf)]);
        assert!(ctx.workspace().buffer_names().is_empty());
    }

    #[test]
    fn conflict_without_ask_fails_before_opening() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("m31.fits").write_str("raw").unwrap();
        temp.child("m31_corrected.tiff").write_str("old").unwrap();
        let mut ctx = context(FakeOperators::new(), &[]);

        let items = vec![FileItem::File(temp.path().join("m31.fits"))];
        let report = execute(&mut ctx, &items, &plan(), &policy(ErrorPolicy::Continue));
        assert_eq!(
            report.errors[0].error,
            ItemError::PathConflict(temp.path().join("m31_corrected.tiff"))
        );
        assert!(ctx.workspace().created().is_empty());
    }

    #[test]
    fn conflict_with_ask_overwrites_on_yes() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("m31.fits").write_str("raw").unwrap();
        temp.child("m31_corrected.tiff").write_str("old").unwrap();
        let mut ctx = context(FakeOperators::new(), &[Confirmation::Yes]);

        let items = vec![FileItem::File(temp.path().join("m31.fits"))];
        let report = execute(&mut ctx, &items, &plan(), &policy(ErrorPolicy::Ask));
        assert!(report.is_success());
        assert!(ctx.confirmer_mut().questions()[0].contains("already exists"));
    }

    #[test]
    fn conflict_with_ask_fails_on_no() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("m31.fits").write_str("raw").unwrap();
        temp.child("m31_corrected.tiff").write_str("old").unwrap();
        let mut ctx = context(FakeOperators::new(), &[Confirmation::No]);

        let items = vec![FileItem::File(temp.path().join("m31.fits"))];
        let report = execute(&mut ctx, &items, &plan(), &policy(ErrorPolicy::Ask));
        assert!(matches!(report.errors[0].error, ItemError::PathConflict(_)));
    }

    #[test]
    fn save_failure_is_a_persist_error() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("m31.fits").write_str("raw").unwrap();
        let mut ctx = context(FakeOperators::new(), &[]);
        ctx.workspace_mut().fail_saves();

        let items = vec![FileItem::File(temp.path().join("m31.fits"))];
        let report = execute(&mut ctx, &items, &plan(), &policy(ErrorPolicy::Continue));
        assert!(matches!(report.errors[0].error, ItemError::Persist { .. }));
        assert!(ctx.workspace().buffer_names().is_empty());
    }

    #[test]
    fn empty_item_list_yields_empty_report() {
        let mut ctx = context(FakeOperators::new(), &[]);
        let report = execute(&mut ctx, &[], &plan(), &policy(ErrorPolicy::Ask));
        assert_eq!(report, RunReport::default());
    }
}
