// src/services/progress.rs

use crate::models::project::{ProgressStage, ProjectProgress, ProjectStatus};

/// Resultado de marcar/desmarcar uma etapa.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageTransition {
    /// Só a etapa mudou.
    StageOnly,
    /// A última etapa pendente foi concluída: o projeto passa a `completed`.
    CompletesProject,
}

/// Aplica a mudança na lista de etapas e decide se o projeto conclui.
///
/// Desmarcar uma etapa de um projeto já concluído não volta o status
/// (catraca de mão única). Retorna `None` se a etapa não existe no projeto.
pub fn apply(
    stages: &mut [ProjectProgress],
    stage: ProgressStage,
    completed: bool,
    project_status: ProjectStatus,
) -> Option<StageTransition> {
    let target = stages.iter_mut().find(|s| s.stage == stage)?;
    target.is_completed = completed;

    let all_done = stages.iter().all(|s| s.is_completed);
    if completed && all_done && project_status != ProjectStatus::Completed {
        Some(StageTransition::CompletesProject)
    } else {
        Some(StageTransition::StageOnly)
    }
}
