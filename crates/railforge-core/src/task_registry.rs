#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskId {
    GenerateRailsApp,
    DesignRailsApp,
}

impl TaskId {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GenerateRailsApp => "generate_rails_app",
            Self::DesignRailsApp => "design_rails_app",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "generate_rails_app" => Some(Self::GenerateRailsApp),
            "design_rails_app" => Some(Self::DesignRailsApp),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSpec {
    pub id: TaskId,
    pub title: &'static str,
    pub description: &'static str,
    pub requires_credential: bool,
}

pub struct TaskRegistry;

const TASK_SPECS: [TaskSpec; 2] = [
    TaskSpec {
        id: TaskId::GenerateRailsApp,
        title: "Generate Rails App",
        description: "Generate a Rails application from a description or specification.",
        requires_credential: false,
    },
    TaskSpec {
        id: TaskId::DesignRailsApp,
        title: "Design Rails App",
        description: "Design a Rails application architecture with AI.",
        requires_credential: true,
    },
];

impl TaskRegistry {
    pub fn list() -> &'static [TaskSpec] {
        &TASK_SPECS
    }

    pub fn get(id: TaskId) -> &'static TaskSpec {
        match id {
            TaskId::GenerateRailsApp => &TASK_SPECS[0],
            TaskId::DesignRailsApp => &TASK_SPECS[1],
        }
    }

    pub fn requires_credential(id: TaskId) -> bool {
        Self::get(id).requires_credential
    }
}
