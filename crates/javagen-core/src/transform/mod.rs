pub mod renamer;

mod operation_transformer;
mod paging;
mod schema_renamer;
mod schema_transformer;

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::config::{ClientFlattenTarget, JavaSettings};
use crate::error::TransformError;
use crate::model::{CodeModel, OperationRef, SchemaType};

/// Options controlling one transformation run.
#[derive(Debug, Clone, Default)]
pub struct TransformOptions {
    pub settings: JavaSettings,

    /// Last-mile `{resolved name -> replacement}` schema overrides, applied
    /// after every other pass.
    pub renames: IndexMap<String, String>,
}

/// Per-run state threaded through every pass. Created fresh per invocation;
/// the memos are never shared between runs.
pub(crate) struct TransformContext<'a> {
    pub(crate) settings: &'a JavaSettings,
    next_parameter_id: u32,

    /// (owning client scope, source group default name, source operation
    /// default name) -> the next-page operation already synthesized for that
    /// source. Keys are scope-qualified: a bare-group operation and a
    /// client-owned operation with the same names are distinct sources and
    /// each get a companion in their own scope.
    pub(crate) synthesized: HashMap<(Option<usize>, String, String), OperationRef>,

    /// (owning client scope, target group name, target operation name) -> the
    /// response schema previously seen for that signature.
    pub(crate) signature_responses: HashMap<(Option<usize>, String, String), SchemaType>,
}

impl<'a> TransformContext<'a> {
    pub(crate) fn new(settings: &'a JavaSettings, model: &CodeModel) -> Self {
        TransformContext {
            settings,
            next_parameter_id: crate::parse::max_parameter_id(model) + 1,
            synthesized: HashMap::new(),
            signature_responses: HashMap::new(),
        }
    }

    pub(crate) fn fresh_parameter_id(&mut self) -> u32 {
        let id = self.next_parameter_id;
        self.next_parameter_id += 1;
        id
    }
}

/// Normalize a code model in place with default options.
pub fn transform(model: &mut CodeModel) -> Result<(), TransformError> {
    transform_with_options(model, &TransformOptions::default())
}

/// Normalize a code model in place.
///
/// The stages run in a fixed order (each stage's postcondition is the next
/// one's precondition) and are not invocable individually: schema renaming
/// first (operations reference renamed schemas), then per-group parameter
/// normalization followed by that group's paging synthesis, and the override
/// renamer strictly last.
pub fn transform_with_options(
    model: &mut CodeModel,
    options: &TransformOptions,
) -> Result<(), TransformError> {
    crate::parse::validate_names(model)?;

    // Parsed models arrive numbered; models assembled in memory usually do
    // not, and id-based dedup would collapse distinct parameters sharing the
    // unassigned id.
    if crate::parse::has_unassigned_parameter_ids(model) {
        crate::parse::assign_parameter_ids(model);
    }

    let mut ctx = TransformContext::new(&options.settings, model);

    // Phase 1: fold parameter groups and rename every schema.
    schema_transformer::transform_schemas(&mut model.schemas);

    // Phase 2: property-level flattening marks, only when flattening is
    // routed through properties rather than a type-level annotation.
    if options.settings.client_flatten_annotation_target == ClientFlattenTarget::Field {
        schema_transformer::mark_flattened_schemas(model);
    }

    // Phases 3 and 4: per-group operation/parameter normalization, each group
    // followed by its paging synthesis.
    operation_transformer::transform_operation_groups(model, &mut ctx)?;

    // Phase 5: user-requested schema renames.
    schema_renamer::apply_renames(model, &options.renames);

    Ok(())
}
