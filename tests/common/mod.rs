//! In-memory OrangeHRM used by the integration tests.
//!
//! [`FakeHrm`] implements [`Browser`] by recognising the selectors the
//! locator resolver produces and simulating the login, admin list and
//! add-user screens. Knobs reproduce the slow or broken behaviour each test
//! needs; the action log records every click and fill.

#![allow(dead_code)]

use std::io::Cursor;
use std::sync::{Arc, Once};

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, RgbImage};
use parking_lot::Mutex;

use orangehrm_admin_e2e::locator::listbox_option;
use orangehrm_admin_e2e::{
    Browser, By, Error, Field, Launcher, ReadyState, Result, Session, Settings, Timeouts,
};

// ============================================================================
// Constants
// ============================================================================

pub const ADMIN_USER: &str = "Admin";
pub const ADMIN_PASSWORD: &str = "admin123";
pub const BASE_URL: &str = "http://hrm.test/web/index.php/auth/login";

const ROLES: [&str; 2] = ["Admin", "ESS"];
const STATUSES: [&str; 2] = ["Enabled", "Disabled"];
const SEARCHING: &str = "Searching....";
const NO_RECORDS: &str = "No Records Found";

/// Controls that exist at most once per screen.
const CONTROLS: [Field; 17] = [
    Field::LoginUsername,
    Field::LoginPassword,
    Field::LoginSubmit,
    Field::AdminMenu,
    Field::AddButton,
    Field::SearchUsername,
    Field::SearchButton,
    Field::ResetButton,
    Field::RecordCount,
    Field::ConfirmDelete,
    Field::UserRoleDropdown,
    Field::EmployeeName,
    Field::StatusDropdown,
    Field::NewUsername,
    Field::Password,
    Field::ConfirmPassword,
    Field::SaveButton,
];

// ============================================================================
// Logging
// ============================================================================

pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "orangehrm_admin_e2e=debug".into()),
            )
            .with_test_writer()
            .try_init();
    });
}

// ============================================================================
// Model
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Blank,
    Login,
    Dashboard,
    AdminList,
    AddForm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Listbox {
    Role,
    Status,
    Employee,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub username: String,
    pub role: String,
    pub employee: String,
    pub status: String,
}

impl UserRow {
    fn new(username: &str) -> Self {
        Self {
            username: username.to_string(),
            role: "ESS".to_string(),
            employee: "Orange Test".to_string(),
            status: "Enabled".to_string(),
        }
    }

    fn render(&self) -> String {
        format!(
            "{}\n{}\n{}\n{}",
            self.username, self.role, self.employee, self.status
        )
    }
}

#[derive(Debug, Default, Clone)]
struct Form {
    role: Option<String>,
    employee: Option<String>,
    status: Option<String>,
    username: String,
    password: String,
    confirm: String,
}

/// Element handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Control(Field),
    Row(String),
    Trash(String),
    Option(String),
    Toast,
}

/// Behaviour switches.
#[derive(Debug, Clone)]
pub struct Knobs {
    /// Polls of the employee listbox that still show the placeholder.
    pub suggestion_delay: u32,
    /// Employees offered by the autocomplete.
    pub employees: Vec<String>,
    /// Whether a save shows the success toast.
    pub save_confirms: bool,
    /// Whether the count label is rendered invisible.
    pub label_hidden: bool,
    /// Count label text override.
    pub label_text: Option<String>,
    /// Reads of the count label that still show the pre-reset text.
    pub reset_lag: u32,
    /// The document never reaches `complete`.
    pub load_never_completes: bool,
    /// The role dropdown stays disabled.
    pub form_disabled: bool,
    /// Screenshots fail.
    pub screenshot_fails: bool,
    /// Quit fails.
    pub quit_fails: bool,
    /// The delete dialog never opens.
    pub dialog_never_opens: bool,
    /// Every resource count read reports a new fetch.
    pub network_never_idle: bool,
    /// A control rendered twice while present.
    pub duplicated: Option<Field>,
}

impl Default for Knobs {
    fn default() -> Self {
        Self {
            suggestion_delay: 2,
            employees: vec!["Orange Test".to_string(), "Anna Lee".to_string()],
            save_confirms: true,
            label_hidden: false,
            label_text: None,
            reset_lag: 0,
            load_never_completes: false,
            form_disabled: false,
            screenshot_fails: false,
            quit_fails: false,
            dialog_never_opens: false,
            network_never_idle: false,
            duplicated: None,
        }
    }
}

#[derive(Debug)]
struct State {
    knobs: Knobs,
    screen: Screen,
    users: Vec<UserRow>,
    login_user: String,
    login_password: String,
    search_input: String,
    filter: Option<String>,
    listbox: Option<Listbox>,
    suggestion_polls: u32,
    form: Form,
    dialog: Option<String>,
    toast: bool,
    stale_label: Option<(String, u32)>,
    pending_loads: u32,
    network_burst: u32,
    resources: u64,
    actions: Vec<String>,
    screenshots: u32,
    quits: u32,
}

// ============================================================================
// FakeHrm
// ============================================================================

/// Shared handle; clones observe the same state.
#[derive(Debug, Clone)]
pub struct FakeHrm {
    state: Arc<Mutex<State>>,
}

impl Default for FakeHrm {
    fn default() -> Self {
        Self::new(Knobs::default())
    }
}

impl FakeHrm {
    /// Ten existing users, login screen not yet opened.
    pub fn new(knobs: Knobs) -> Self {
        let users = [
            "Admin",
            "fiona.grace",
            "jobin.sam",
            "linda.anderson",
            "odis.adalwin",
            "peter.mac",
            "rebecca.harmony",
            "russel.hamilton",
            "thomas.benjamin",
            "charlie.carter",
        ]
        .into_iter()
        .map(UserRow::new)
        .collect();

        Self {
            state: Arc::new(Mutex::new(State {
                knobs,
                screen: Screen::Blank,
                users,
                login_user: String::new(),
                login_password: String::new(),
                search_input: String::new(),
                filter: None,
                listbox: None,
                suggestion_polls: 0,
                form: Form::default(),
                dialog: None,
                toast: false,
                stale_label: None,
                pending_loads: 0,
                network_burst: 0,
                resources: 12,
                actions: Vec::new(),
                screenshots: 0,
                quits: 0,
            })),
        }
    }

    pub fn session(&self) -> Session<FakeHrm> {
        Session::new(self.clone(), test_timeouts())
    }

    pub fn knobs(&self, update: impl FnOnce(&mut Knobs)) {
        update(&mut self.state.lock().knobs);
    }

    /// Puts the browser on the admin list as if logged in.
    pub fn open_admin_list(&self) {
        let mut state = self.state.lock();
        state.screen = Screen::AdminList;
        state.filter = None;
    }

    pub fn add_existing_user(&self, username: &str) {
        self.state.lock().users.push(UserRow::new(username));
    }

    pub fn user_count(&self) -> usize {
        self.state.lock().users.len()
    }

    pub fn user(&self, username: &str) -> Option<UserRow> {
        self.state
            .lock()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned()
    }

    pub fn screen(&self) -> Screen {
        self.state.lock().screen
    }

    pub fn actions(&self) -> Vec<String> {
        self.state.lock().actions.clone()
    }

    pub fn clicked(&self, name: &str) -> bool {
        let wanted = format!("click:{name}");
        self.actions().iter().any(|a| *a == wanted)
    }

    pub fn screenshots(&self) -> u32 {
        self.state.lock().screenshots
    }

    pub fn quits(&self) -> u32 {
        self.state.lock().quits
    }
}

pub fn test_timeouts() -> Timeouts {
    Timeouts {
        navigation_ms: 5_000,
        form_ms: 2_000,
        label_ms: 2_000,
        search_ms: 3_000,
        suggestions_ms: 2_000,
        save_ms: 2_000,
        poll_interval_ms: 100,
        network_quiet_ms: 300,
    }
}

pub fn test_settings(record_video: bool) -> Settings {
    Settings::builder()
        .base_url(BASE_URL)
        .credentials(ADMIN_USER, ADMIN_PASSWORD)
        .record_video(record_video)
        .timeouts(test_timeouts())
        .build()
        .unwrap()
}

// ============================================================================
// FakeHrm - Rendering
// ============================================================================

impl State {
    fn visible_rows(&self) -> Vec<&UserRow> {
        self.users
            .iter()
            .filter(|u| self.filter.as_ref().is_none_or(|f| u.username == *f))
            .collect()
    }

    fn label_text(&mut self) -> String {
        if let Some((text, remaining)) = self.stale_label.as_mut() {
            if *remaining > 0 {
                *remaining -= 1;
                return text.clone();
            }
        }
        self.stale_label = None;

        if let Some(text) = &self.knobs.label_text {
            return text.clone();
        }
        match self.visible_rows().len() {
            0 => NO_RECORDS.to_string(),
            1 => "(1) Record Found".to_string(),
            n => format!("({n}) Records Found"),
        }
    }

    fn has_control(&self, field: Field) -> bool {
        match (self.screen, field) {
            (Screen::Login, Field::LoginUsername | Field::LoginPassword | Field::LoginSubmit) => {
                true
            }
            (Screen::Dashboard | Screen::AdminList | Screen::AddForm, Field::AdminMenu) => true,
            (
                Screen::AdminList,
                Field::AddButton
                | Field::SearchUsername
                | Field::SearchButton
                | Field::ResetButton
                | Field::RecordCount,
            ) => true,
            (Screen::AdminList, Field::ConfirmDelete) => self.dialog.is_some(),
            (
                Screen::AddForm,
                Field::UserRoleDropdown
                | Field::EmployeeName
                | Field::StatusDropdown
                | Field::NewUsername
                | Field::Password
                | Field::ConfirmPassword
                | Field::SaveButton,
            ) => true,
            _ => false,
        }
    }

    /// Current listbox entries; each read of the employee list counts as a poll.
    fn listbox_entries(&mut self) -> Vec<String> {
        match self.listbox {
            None => Vec::new(),
            Some(Listbox::Role) => ROLES.iter().map(|s| s.to_string()).collect(),
            Some(Listbox::Status) => STATUSES.iter().map(|s| s.to_string()).collect(),
            Some(Listbox::Employee) => {
                if self.suggestion_polls > 0 {
                    self.suggestion_polls -= 1;
                    return vec![SEARCHING.to_string()];
                }
                if self.knobs.employees.is_empty() {
                    vec![NO_RECORDS.to_string()]
                } else {
                    self.knobs.employees.clone()
                }
            }
        }
    }

    fn navigate_to(&mut self, screen: Screen) {
        self.screen = screen;
        self.listbox = None;
        self.pending_loads = 2;
        self.network_burst = 3;
    }
}

/// Text a `listbox_option` selector filters on.
fn option_filter(by: &By) -> Option<String> {
    let prefix = "//div[@role='listbox']//span[contains(text(), ";
    let literal = by.value().strip_prefix(prefix)?.strip_suffix(")]")?;
    let unquoted = literal
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .or_else(|| literal.strip_prefix('"').and_then(|s| s.strip_suffix('"')))?;
    Some(unquoted.to_string())
}

fn tiny_png() -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 3, image::Rgb([200, 80, 20])));
    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, ImageFormat::Png)
        .map(|()| bytes.into_inner())
        .unwrap_or_default()
}

// ============================================================================
// Browser Implementation
// ============================================================================

#[async_trait]
impl Browser for FakeHrm {
    type Element = Node;

    async fn navigate(&self, url: &str) -> Result<()> {
        let mut state = self.state.lock();
        state.actions.push(format!("navigate:{url}"));
        state.navigate_to(Screen::Login);
        Ok(())
    }

    async fn find_all(&self, by: &By) -> Result<Vec<Node>> {
        let mut state = self.state.lock();

        if let Some(field) = CONTROLS.iter().find(|f| f.locator().by() == by) {
            return Ok(if state.has_control(*field) {
                let copies = if state.knobs.duplicated == Some(*field) { 2 } else { 1 };
                vec![Node::Control(*field); copies]
            } else {
                Vec::new()
            });
        }
        if Field::ResultRows.locator().by() == by {
            if state.screen != Screen::AdminList {
                return Ok(Vec::new());
            }
            return Ok(state
                .visible_rows()
                .into_iter()
                .map(|u| Node::Row(u.username.clone()))
                .collect());
        }
        if Field::SaveSuccess.locator().by() == by {
            return Ok(if state.toast { vec![Node::Toast] } else { Vec::new() });
        }
        if Field::ListboxOptions.locator().by() == by {
            return Ok(state.listbox_entries().into_iter().map(Node::Option).collect());
        }
        if let Some(text) = option_filter(by) {
            debug_assert_eq!(listbox_option(&text).by(), by);
            return Ok(state
                .listbox_entries()
                .into_iter()
                .filter(|entry| entry.contains(&text))
                .map(Node::Option)
                .collect());
        }
        Ok(Vec::new())
    }

    async fn find_all_within(&self, parent: &Node, by: &By) -> Result<Vec<Node>> {
        match parent {
            Node::Row(username) if Field::RowDelete.locator().by() == by => {
                Ok(vec![Node::Trash(username.clone())])
            }
            _ => Ok(Vec::new()),
        }
    }

    async fn click(&self, element: &Node) -> Result<()> {
        let mut state = self.state.lock();
        match element {
            Node::Control(field) => {
                let name = field.locator().name().to_string();
                state.actions.push(format!("click:{name}"));
                match field {
                    Field::LoginSubmit => {
                        if state.login_user == ADMIN_USER
                            && state.login_password == ADMIN_PASSWORD
                        {
                            state.navigate_to(Screen::Dashboard);
                        } else {
                            state.pending_loads = 1;
                        }
                    }
                    Field::AdminMenu => {
                        state.navigate_to(Screen::AdminList);
                        state.filter = None;
                        state.toast = false;
                    }
                    Field::AddButton => {
                        state.navigate_to(Screen::AddForm);
                        state.form = Form::default();
                        state.toast = false;
                    }
                    Field::UserRoleDropdown => state.listbox = Some(Listbox::Role),
                    Field::StatusDropdown => state.listbox = Some(Listbox::Status),
                    Field::SearchButton => {
                        let input = state.search_input.clone();
                        state.filter = (!input.is_empty()).then_some(input);
                        state.toast = false;
                    }
                    Field::ResetButton => {
                        let shown = state.label_text();
                        let lag = state.knobs.reset_lag;
                        state.stale_label = (lag > 0).then_some((shown, lag));
                        state.filter = None;
                        state.search_input.clear();
                    }
                    Field::ConfirmDelete => {
                        if let Some(username) = state.dialog.take() {
                            state.users.retain(|u| u.username != username);
                            state.actions.push(format!("deleted:{username}"));
                        }
                    }
                    Field::SaveButton => {
                        let form = state.form.clone();
                        state.users.push(UserRow {
                            username: form.username,
                            role: form.role.unwrap_or_default(),
                            employee: form.employee.unwrap_or_default(),
                            status: form.status.unwrap_or_default(),
                        });
                        state.navigate_to(Screen::AdminList);
                        state.filter = None;
                        state.toast = state.knobs.save_confirms;
                    }
                    _ => {}
                }
            }
            Node::Option(text) => {
                state.actions.push(format!("select:{text}"));
                match state.listbox.take() {
                    Some(Listbox::Role) => state.form.role = Some(text.clone()),
                    Some(Listbox::Status) => state.form.status = Some(text.clone()),
                    Some(Listbox::Employee) => state.form.employee = Some(text.clone()),
                    None => {}
                }
            }
            Node::Trash(username) => {
                state.actions.push(format!("click:trash:{username}"));
                if !state.knobs.dialog_never_opens {
                    state.dialog = Some(username.clone());
                }
            }
            Node::Row(_) | Node::Toast => {}
        }
        Ok(())
    }

    async fn fill(&self, element: &Node, text: &str) -> Result<()> {
        let mut state = self.state.lock();
        let Node::Control(field) = element else {
            return Err(Error::element_not_found("fill target is not an input"));
        };
        state
            .actions
            .push(format!("fill:{}:{text}", field.locator().name()));
        match field {
            Field::LoginUsername => state.login_user = text.to_string(),
            Field::LoginPassword => state.login_password = text.to_string(),
            Field::SearchUsername => state.search_input = text.to_string(),
            Field::NewUsername => state.form.username = text.to_string(),
            Field::Password => state.form.password = text.to_string(),
            Field::ConfirmPassword => state.form.confirm = text.to_string(),
            Field::EmployeeName => {
                state.listbox = Some(Listbox::Employee);
                state.suggestion_polls = state.knobs.suggestion_delay;
            }
            _ => {}
        }
        Ok(())
    }

    async fn text(&self, element: &Node) -> Result<String> {
        let mut state = self.state.lock();
        Ok(match element {
            Node::Control(Field::RecordCount) => state.label_text(),
            Node::Control(_) => String::new(),
            Node::Row(username) => state
                .users
                .iter()
                .find(|u| u.username == *username)
                .map(UserRow::render)
                .unwrap_or_default(),
            Node::Trash(_) => String::new(),
            Node::Option(text) => text.clone(),
            Node::Toast => "Success\nSuccessfully Saved".to_string(),
        })
    }

    async fn is_visible(&self, element: &Node) -> Result<bool> {
        let state = self.state.lock();
        Ok(match element {
            Node::Control(Field::RecordCount) => !state.knobs.label_hidden,
            _ => true,
        })
    }

    async fn is_enabled(&self, element: &Node) -> Result<bool> {
        let state = self.state.lock();
        Ok(match element {
            Node::Control(Field::UserRoleDropdown) => !state.knobs.form_disabled,
            _ => true,
        })
    }

    async fn ready_state(&self) -> Result<ReadyState> {
        let mut state = self.state.lock();
        if state.knobs.load_never_completes {
            return Ok(ReadyState::Interactive);
        }
        if state.pending_loads > 0 {
            state.pending_loads -= 1;
            return Ok(ReadyState::Loading);
        }
        Ok(ReadyState::Complete)
    }

    async fn resource_count(&self) -> Result<u64> {
        let mut state = self.state.lock();
        if state.knobs.network_never_idle {
            state.resources += 1;
        } else if state.network_burst > 0 {
            state.network_burst -= 1;
            state.resources += 3;
        }
        Ok(state.resources)
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        let mut state = self.state.lock();
        if state.knobs.screenshot_fails {
            return Err(Error::capture("screenshot unavailable"));
        }
        state.screenshots += 1;
        Ok(tiny_png())
    }

    async fn quit(&self) -> Result<()> {
        let mut state = self.state.lock();
        state.quits += 1;
        if state.knobs.quit_fails {
            return Err(Error::capture("browser already gone"));
        }
        Ok(())
    }
}

// ============================================================================
// FakeLauncher
// ============================================================================

/// Hands out the same [`FakeHrm`] on every launch.
#[derive(Debug, Clone, Default)]
pub struct FakeLauncher {
    pub hrm: FakeHrm,
    pub fail: bool,
}

#[async_trait]
impl Launcher for FakeLauncher {
    type Browser = FakeHrm;

    async fn launch(&self) -> Result<FakeHrm> {
        if self.fail {
            return Err(Error::config("no browser available"));
        }
        Ok(self.hrm.clone())
    }
}
