/// Every user-facing message of the CLI. Text lives in `display.rs`.
#[derive(Debug, Clone)]
pub enum Message {
    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigDeleted,
    ConfigFileNotFound,
    ConfigLocation(String), // path
    ConfigModuleStore,
    ConfigModuleAnalytics,
    InvalidUtcOffset(String),

    // === PROMPTS ===
    PromptSelectModules,
    PromptStorePath,
    PromptDoneStage,
    PromptCompletionSource,
    PromptBusyTimeout,
    PromptUtcOffset,
    PromptStalledAfterDays,

    // === STORE MESSAGES ===
    StoreCreated(String),     // path
    StoreUnavailable(String), // reason
    StoreLocation(String),    // path
    RecordsQuarantined(usize),

    // === DASHBOARD MESSAGES ===
    DashboardHeader(String), // reference time
    ProjectProgressHeader,
    ProductivityHeader,
    DelayCompositionHeader,
    CompletionVelocityHeader,
    AlertsHeader,
    AlertSummaryHeader,
    NoProjectsFound,
    RulesSkipped(String), // rule names
    InvalidNowTimestamp(String),

    // === DETAIL MESSAGES ===
    ProgressDetailsHeader(String, usize, usize, u8), // project, done, total, progress
    CategoryDetailsHeader(String, usize, usize, u8), // label, done, total, progress
    DelayDetailsHeader(String),                      // project
    CompletionDetailsHeader(String, usize, usize),   // project, completed, total
    OverdueTasksHeader,
    UnassignedTasksHeader,
    MissingDueDateHeader,
    StalledProjectsHeader,
    AssigneesUnavailable,
    NoMatchingTasks,

    // === EXPORT MESSAGES ===
    ExportingData(String, String), // data, format
    ExportCompleted(String),       // path

    // === MIGRATION MESSAGES ===
    MigrationsFound(usize),
    RunningMigration(u32, String),
    MigrationCompleted(u32),
    MigrationFailed(u32, String),
    AllMigrationsCompleted,
    DatabaseVersion(u32),
    DatabaseUpToDate,
    DatabaseNeedsUpdate,
    MigrationHistory,
    NothingToRollback,
    RollingBack(u32, u32),
    RollbackCompleted(u32),
}
