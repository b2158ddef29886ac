// Line-oriented front end driving the booking desk and account surfaces.

use std::fmt::Write as _;
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::domain::{BookingMode, FormField, Navigator, ProfileError, Route};
use crate::interface_adapters::state::{PortalAuthFlow, PortalProfileEditor, PortalState};
use crate::use_cases::{BookingDesk, DialogState, DialogView, ProfileField, SignUpForm};

const HELP: &str = "\
Commands:
  properties [area]        list properties, optionally filtered by area
  safaris                  list safari packages
  view [property id]       schedule a viewing
  book [safari id]         book a safari
  custom                   request a custom itinerary
  set <field> <value>      fill a booking field (name, email, phone, date, time, group_size, notes)
  submit                   send the open booking
  login                    go to sign-in from a booking that needs it
  close                    close the open booking
  signin <email> <password>
  signup <email> <password> <first name> <last name> <country>
  signout
  profile [field value]    show the profile, or update one field and save
  back                     go to the previous page
  state                    show the current page and booking
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Properties(Option<String>),
    Safaris,
    View(Option<u32>),
    Book(Option<u32>),
    Custom,
    Set(FormField, String),
    Submit,
    Login,
    Close,
    SignIn { email: String, password: String },
    SignUp(SignUpForm),
    SignOut,
    Profile(Option<(ProfileField, String)>),
    Back,
    State,
    Help,
    Quit,
}

// First whitespace-separated word and the trimmed remainder.
fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim();
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    }
}

fn optional_id(rest: &str, usage: &str) -> Result<Option<u32>, String> {
    if rest.is_empty() {
        return Ok(None);
    }
    rest.parse().map(Some).map_err(|_| usage.to_string())
}

impl Command {
    // `Ok(None)` for blank lines.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let (word, rest) = split_word(line);
        let command = match word.to_ascii_lowercase().as_str() {
            "" => return Ok(None),
            "properties" => Command::Properties((!rest.is_empty()).then(|| rest.to_string())),
            "safaris" => Command::Safaris,
            "view" => Command::View(optional_id(rest, "Usage: view [property id]")?),
            "book" => Command::Book(optional_id(rest, "Usage: book [safari id]")?),
            "custom" => Command::Custom,
            "set" => {
                let (name, value) = split_word(rest);
                let field = FormField::parse(name).ok_or_else(|| format!("Unknown field: {name}"))?;
                Command::Set(field, value.to_string())
            }
            "submit" => Command::Submit,
            "login" => Command::Login,
            "close" => Command::Close,
            "signin" => match rest.split_whitespace().collect::<Vec<_>>().as_slice() {
                [email, password] => Command::SignIn {
                    email: email.to_string(),
                    password: password.to_string(),
                },
                _ => return Err("Usage: signin <email> <password>".to_string()),
            },
            "signup" => {
                let (email, rest) = split_word(rest);
                let (password, rest) = split_word(rest);
                let (first_name, rest) = split_word(rest);
                let (last_name, country) = split_word(rest);
                if password.is_empty() {
                    return Err(
                        "Usage: signup <email> <password> <first name> <last name> <country>"
                            .to_string(),
                    );
                }
                Command::SignUp(SignUpForm {
                    email: email.to_string(),
                    password: password.to_string(),
                    first_name: first_name.to_string(),
                    last_name: last_name.to_string(),
                    country: country.to_string(),
                })
            }
            "signout" => Command::SignOut,
            "profile" if rest.is_empty() => Command::Profile(None),
            "profile" => {
                let (name, value) = split_word(rest);
                let field = ProfileField::parse(name)
                    .ok_or_else(|| format!("Unknown profile field: {name}"))?;
                Command::Profile(Some((field, value.to_string())))
            }
            "back" => Command::Back,
            "state" => Command::State,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(format!("Unknown command: {other}. Type `help`.")),
        };
        Ok(Some(command))
    }
}

pub struct Console {
    state: PortalState,
    desk: BookingDesk,
    auth: PortalAuthFlow,
    profiles: PortalProfileEditor,
}

impl Console {
    pub fn new(state: PortalState) -> Self {
        Self {
            desk: state.booking_desk(),
            auth: state.auth_flow(),
            profiles: state.profile_editor(),
            state,
        }
    }

    // `None` once the user asked to quit.
    pub async fn execute(&mut self, command: Command) -> Option<String> {
        let reply = match command {
            Command::Properties(area) => self.list_properties(area.as_deref().unwrap_or_default()),
            Command::Safaris => self.list_safaris(),
            Command::View(id) => {
                let property = match id {
                    Some(id) => match self.state.catalog.property(id) {
                        Some(property) => Some(property),
                        None => return Some(format!("No property with id {id}")),
                    },
                    None => None,
                };
                self.desk.open_viewing(property).await;
                self.render_dialog()
            }
            Command::Book(id) => {
                let safari = match id {
                    Some(id) => match self.state.catalog.safari(id) {
                        Some(safari) => Some(safari),
                        None => return Some(format!("No safari with id {id}")),
                    },
                    None => None,
                };
                self.desk.open_safari_booking(safari).await;
                self.render_dialog()
            }
            Command::Custom => {
                self.desk.open_custom_itinerary().await;
                self.render_dialog()
            }
            Command::Set(field, value) => {
                if self.desk.edit(field, value) {
                    self.render_dialog()
                } else {
                    "Nothing to edit right now".to_string()
                }
            }
            Command::Submit => {
                if self.desk.active().is_none() {
                    return Some("No booking is open".to_string());
                }
                self.desk.submit().await;
                self.render_dialog()
            }
            Command::Login => self.login().await,
            Command::Close => {
                self.desk.close();
                "Booking closed".to_string()
            }
            Command::SignIn { email, password } => {
                match self.auth.sign_in(&email, &password).await {
                    Ok(message) => {
                        self.desk.close();
                        let profile = self.render_profile().await;
                        format!("{message}\n{profile}")
                    }
                    Err(err) => err.to_string(),
                }
            }
            Command::SignUp(form) => match self.auth.sign_up(form).await {
                Ok(message) => message.to_string(),
                Err(err) => err.to_string(),
            },
            Command::SignOut => {
                self.desk.close();
                match self.auth.sign_out().await {
                    Ok(()) => "Signed out".to_string(),
                    Err(err) => format!("Signed out locally: {err}"),
                }
            }
            Command::Profile(None) => {
                if !self.desk.view_profile() {
                    self.state.navigator.navigate(Route::Profile.path());
                }
                self.desk.close();
                self.render_profile().await
            }
            Command::Profile(Some((field, value))) => self.update_profile(field, &value).await,
            Command::Back => {
                let route = self.state.navigator.back();
                format!("Now on {}", route.path())
            }
            Command::State => self.render_state(),
            Command::Help => HELP.to_string(),
            Command::Quit => return None,
        };
        Some(reply)
    }

    async fn login(&mut self) -> String {
        if !self.desk.go_to_login() {
            return "Login is offered when a booking needs it; use `signin` directly".to_string();
        }
        // Leaving the home page unmounts the booking dialogs.
        self.desk.close();
        if self.auth.resume().await {
            let profile = self.render_profile().await;
            return format!("Already signed in\n{profile}");
        }
        "Sign in with: signin <email> <password>".to_string()
    }

    async fn update_profile(&mut self, field: ProfileField, value: &str) -> String {
        let mut view = match self.profiles.load().await {
            Ok(view) => view,
            Err(err) => return err.to_string(),
        };
        if !view.form.set(field, value) {
            return "Preference must be buy, rent or safari".to_string();
        }
        match self.profiles.save(&view.form).await {
            Ok(message) => message.to_string(),
            Err(err) => err.to_string(),
        }
    }

    fn list_properties(&self, area: &str) -> String {
        let properties = self.state.catalog.properties_in_area(area);
        if properties.is_empty() {
            return format!("No properties in {area}");
        }
        let mut out = String::new();
        for property in properties {
            let featured = if property.featured { " *" } else { "" };
            let _ = writeln!(
                out,
                "{}. {}{featured} | {} | {} | {} bd / {} ba",
                property.id,
                property.title,
                property.location,
                property.price,
                property.bedrooms,
                property.bathrooms
            );
        }
        out.trim_end().to_string()
    }

    fn list_safaris(&self) -> String {
        let mut out = String::new();
        for safari in self.state.catalog.safaris() {
            let per_person = if safari.per_person { " per person" } else { "" };
            let _ = writeln!(
                out,
                "{}. {} | {} | {}{per_person}",
                safari.id, safari.title, safari.duration, safari.price
            );
        }
        out.trim_end().to_string()
    }

    async fn render_profile(&self) -> String {
        match self.profiles.load().await {
            Ok(view) => {
                let form = &view.form;
                let mut out = String::new();
                let _ = writeln!(out, "[{}] {}", form.initials(), view.email);
                if !view.exists {
                    let _ = writeln!(out, "No profile yet; set fields with `profile <field> <value>`");
                }
                let _ = writeln!(out, "  first_name: {}", form.first_name);
                let _ = writeln!(out, "  last_name: {}", form.last_name);
                let _ = writeln!(out, "  phone: {}", form.phone);
                let _ = writeln!(out, "  location: {}", form.location);
                let _ = writeln!(out, "  preference: {}", form.preference.as_str());
                let _ = write!(out, "  about: {}", form.about);
                out
            }
            Err(ProfileError::AuthRequired) => {
                "Please log in to continue. Use `signin <email> <password>`".to_string()
            }
            Err(err) => err.to_string(),
        }
    }

    fn render_state(&self) -> String {
        format!(
            "Page: {}\n{}",
            self.state.navigator.current().path(),
            self.render_dialog()
        )
    }

    fn render_dialog(&self) -> String {
        match self.desk.view() {
            Some(view) => render_view(&view),
            None => "No booking is open".to_string(),
        }
    }
}

fn render_view(view: &DialogView<'_>) -> String {
    let mut out = String::new();
    let (heading, fields): (&str, &[FormField]) = match view.mode {
        BookingMode::Viewing => ("Schedule a viewing", VIEWING_FIELDS),
        BookingMode::SafariBook => ("Book safari", SAFARI_FIELDS),
        BookingMode::SafariCustom => ("Custom itinerary", SAFARI_FIELDS),
    };
    let _ = write!(out, "{heading}");
    if let Some(title) = view.target.title.as_deref() {
        let _ = write!(out, " | {title}");
    }
    out.push('\n');

    match view.state {
        DialogState::Closed => out.push_str("Closed"),
        DialogState::Prefilling => out.push_str("Loading your details..."),
        DialogState::AuthRequired => {
            let message = view.error.unwrap_or("Please log in to continue.");
            let _ = write!(out, "{message} Type `login` to sign in.");
        }
        DialogState::Submitting => out.push_str("Submitting..."),
        DialogState::Success => {
            let message = view.success.unwrap_or_default();
            let _ = write!(out, "{message}\nType `profile` to view your profile.");
        }
        DialogState::Form => {
            for field in fields {
                let label = match (view.mode, field) {
                    (BookingMode::Viewing, _) => field.as_str(),
                    (_, FormField::Date) => "start_date",
                    _ => field.as_str(),
                };
                let _ = writeln!(out, "  {label}: {}", view.draft.get(*field));
            }
            if let Some(error) = view.error {
                let _ = writeln!(out, "  ! {error}");
            }
            out.truncate(out.trim_end().len());
        }
    }
    out
}

const VIEWING_FIELDS: &[FormField] = &[
    FormField::Name,
    FormField::Email,
    FormField::Phone,
    FormField::Date,
    FormField::Time,
    FormField::Notes,
];

const SAFARI_FIELDS: &[FormField] = &[
    FormField::Name,
    FormField::Email,
    FormField::Phone,
    FormField::Date,
    FormField::GroupSize,
];

// Reads commands until `quit` or end of input.
pub async fn run<R, W>(mut console: Console, input: R, mut output: W) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    output
        .write_all(b"Booking portal. Type `help` for commands.\n")
        .await?;
    output.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let reply = match Command::parse(&line) {
            Ok(None) => continue,
            Ok(Some(command)) => match console.execute(command).await {
                Some(reply) => reply,
                None => break,
            },
            Err(message) => message,
        };
        output.write_all(reply.as_bytes()).await?;
        output.write_all(b"\n").await?;
        output.flush().await?;
    }
    Ok(())
}
