use crate::ports::{Confirmer, ImageWorkspace, StageOperators};

/// Collaborators a batch run works against.
pub struct AppContext<W, O, C>
where
    W: ImageWorkspace,
    O: StageOperators<W>,
    C: Confirmer,
{
    workspace: W,
    operators: O,
    confirmer: C,
}

impl<W, O, C> AppContext<W, O, C>
where
    W: ImageWorkspace,
    O: StageOperators<W>,
    C: Confirmer,
{
    pub fn new(workspace: W, operators: O, confirmer: C) -> Self {
        Self { workspace, operators, confirmer }
    }

    pub fn workspace(&self) -> &W {
        &self.workspace
    }

    pub fn workspace_mut(&mut self) -> &mut W {
        &mut self.workspace
    }

    pub fn operators(&self) -> &O {
        &self.operators
    }

    pub fn confirmer_mut(&mut self) -> &mut C {
        &mut self.confirmer
    }

    /// Borrow every collaborator at once.
    pub fn parts_mut(&mut self) -> (&mut W, &O, &mut C) {
        (&mut self.workspace, &self.operators, &mut self.confirmer)
    }
}
