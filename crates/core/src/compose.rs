//! The fixed compose rebuild sequence.
//!
//! A rebuild is four mandatory steps (stop, remove, build, start) followed
//! by two best-effort steps (status, logs). [`ComposeAction`] renders each
//! one into shell text for a given compose binary and service.

/// Maximum accepted length of a service name.
const MAX_SERVICE_NAME_LEN: usize = 128;

/// Allowed service name characters: alphanumeric, hyphen, underscore, dot.
///
/// The name is interpolated into shell text, so anything else is rejected.
pub fn is_safe_service_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_SERVICE_NAME_LEN
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
}

/// Whether a step's failure aborts the rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPhase {
    Mandatory,
    BestEffort,
}

/// One compose subcommand issued against the target service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeAction {
    Stop,
    Remove,
    Build,
    Up,
    Status,
    Logs { tail: u32 },
}

impl ComposeAction {
    /// Subcommand and flags placed between the binary and the service name.
    fn subcommand(&self) -> String {
        match self {
            Self::Stop => "stop".to_string(),
            Self::Remove => "rm -f".to_string(),
            Self::Build => "build".to_string(),
            Self::Up => "up -d".to_string(),
            Self::Status => "ps".to_string(),
            Self::Logs { tail } => format!("logs --tail={tail}"),
        }
    }

    /// Progress text announced before the step runs.
    pub fn description(&self, service: &str) -> String {
        match self {
            Self::Stop => format!("Stopping {service}"),
            Self::Remove => "Removing existing container".to_string(),
            Self::Build => format!("Building new {service} image"),
            Self::Up => format!("Starting {service}"),
            Self::Status => "Checking service status".to_string(),
            Self::Logs { .. } => "Showing recent logs".to_string(),
        }
    }

    pub fn phase(&self) -> StepPhase {
        match self {
            Self::Stop | Self::Remove | Self::Build | Self::Up => StepPhase::Mandatory,
            Self::Status | Self::Logs { .. } => StepPhase::BestEffort,
        }
    }

    /// Render the full shell command, e.g. `docker-compose rm -f web`.
    pub fn render(&self, compose_bin: &str, service: &str) -> String {
        format!("{compose_bin} {} {service}", self.subcommand())
    }
}

/// A rendered command paired with the text announced before it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeStep {
    pub action: ComposeAction,
    pub command: String,
    pub description: String,
}

impl ComposeStep {
    pub fn new(action: ComposeAction, compose_bin: &str, service: &str) -> Self {
        Self {
            action,
            command: action.render(compose_bin, service),
            description: action.description(service),
        }
    }

    pub fn phase(&self) -> StepPhase {
        self.action.phase()
    }
}

/// The ordered steps of one rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebuildPlan {
    /// Stop, remove, build, start, in that order.
    pub mandatory: Vec<ComposeStep>,
    pub status: ComposeStep,
    pub logs: ComposeStep,
}

impl RebuildPlan {
    pub fn new(compose_bin: &str, service: &str, log_tail: u32) -> Self {
        let mandatory = [
            ComposeAction::Stop,
            ComposeAction::Remove,
            ComposeAction::Build,
            ComposeAction::Up,
        ]
        .into_iter()
        .map(|action| ComposeStep::new(action, compose_bin, service))
        .collect();

        Self {
            mandatory,
            status: ComposeStep::new(ComposeAction::Status, compose_bin, service),
            logs: ComposeStep::new(ComposeAction::Logs { tail: log_tail }, compose_bin, service),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_service_names() {
        assert!(is_safe_service_name("user-service"));
        assert!(is_safe_service_name("api.v2"));
        assert!(is_safe_service_name("worker_1"));
    }

    #[test]
    fn unsafe_service_names() {
        assert!(!is_safe_service_name(""));
        assert!(!is_safe_service_name("web; rm -rf /"));
        assert!(!is_safe_service_name("$(evil)"));
        assert!(!is_safe_service_name("two words"));
        assert!(!is_safe_service_name(&"a".repeat(200)));
    }

    #[test]
    fn renders_compose_commands() {
        let bin = "docker-compose";
        let svc = "user-service";
        assert_eq!(ComposeAction::Stop.render(bin, svc), "docker-compose stop user-service");
        assert_eq!(ComposeAction::Remove.render(bin, svc), "docker-compose rm -f user-service");
        assert_eq!(ComposeAction::Build.render(bin, svc), "docker-compose build user-service");
        assert_eq!(ComposeAction::Up.render(bin, svc), "docker-compose up -d user-service");
        assert_eq!(ComposeAction::Status.render(bin, svc), "docker-compose ps user-service");
        assert_eq!(
            ComposeAction::Logs { tail: 10 }.render(bin, svc),
            "docker-compose logs --tail=10 user-service"
        );
    }

    #[test]
    fn renders_with_multi_word_binary() {
        assert_eq!(
            ComposeAction::Up.render("docker compose", "web"),
            "docker compose up -d web"
        );
    }

    #[test]
    fn plan_orders_mandatory_steps() {
        let plan = RebuildPlan::new("docker-compose", "web", 10);
        let actions: Vec<_> = plan.mandatory.iter().map(|s| s.action).collect();
        assert_eq!(
            actions,
            vec![
                ComposeAction::Stop,
                ComposeAction::Remove,
                ComposeAction::Build,
                ComposeAction::Up,
            ]
        );
        assert!(plan.mandatory.iter().all(|s| s.phase() == StepPhase::Mandatory));
        assert_eq!(plan.status.phase(), StepPhase::BestEffort);
        assert_eq!(plan.logs.phase(), StepPhase::BestEffort);
    }

    #[test]
    fn plan_uses_configured_log_tail() {
        let plan = RebuildPlan::new("docker-compose", "web", 25);
        assert_eq!(plan.logs.command, "docker-compose logs --tail=25 web");
        assert_eq!(plan.logs.description, "Showing recent logs");
    }

    #[test]
    fn descriptions_name_the_service() {
        let plan = RebuildPlan::new("docker-compose", "user-service", 10);
        let descriptions: Vec<_> = plan.mandatory.iter().map(|s| s.description.as_str()).collect();
        assert_eq!(
            descriptions,
            vec![
                "Stopping user-service",
                "Removing existing container",
                "Building new user-service image",
                "Starting user-service",
            ]
        );
    }
}
