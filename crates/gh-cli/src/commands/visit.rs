//! Interactive town REPL.
//!
//! A thin dispatcher over the facility registry: every line becomes an
//! `(action, params)` pair, every reply is a rendered [`Outcome`]. Confirm
//! quotes park the confirmed params in a pending slot until the player
//! types `confirm` or `cancel`.

use std::io::{self, BufRead, Write};

use colored::Colorize;

use gh_core::{CharacterClass, CharacterId, ItemId, SharedParty, SpellId};
use gh_town::{
    ActionParams, FacilityId, FacilityProfile, FacilityRegistry, FacilityView, OutcomeData,
};

use super::{demo_party, render_outcome};

/// Prints the facility banner at the door.
struct BannerView;

impl FacilityView for BannerView {
    fn entered(&mut self, profile: &FacilityProfile) {
        println!(
            "  {} {}\n  {}",
            profile.icon,
            profile.name.bold(),
            profile.welcome_message.dimmed()
        );
    }

    fn exited(&mut self) {
        println!("  {}", "Back on the town square.".dimmed());
    }
}

/// REPL state: the registry, the party, and any quote awaiting confirmation.
struct TownRepl {
    registry: FacilityRegistry,
    party: SharedParty,
    pending: Option<(String, ActionParams)>,
}

impl TownRepl {
    fn new(gold: u32) -> Self {
        let mut registry = FacilityRegistry::new();
        for id in FacilityId::ALL {
            registry.attach_view(id, Box::new(BannerView));
        }
        Self {
            registry,
            party: demo_party(gold).shared(),
            pending: None,
        }
    }

    /// Process one line of input and return the reply to print.
    fn process(&mut self, input: &str) -> String {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return String::new();
        }
        let parts: Vec<&str> = trimmed.split_whitespace().collect();
        let cmd = parts[0].to_lowercase();
        let args = &parts[1..];

        match cmd.as_str() {
            "enter" => self.do_enter(args),
            "leave" => self.do_leave(),
            "menu" => self.do_menu(),
            "status" => self.do_status(),
            "confirm" => self.do_confirm(),
            "cancel" => self.do_cancel(),
            "help" => help_text().to_string(),
            "quit" | "q" => "Safe travels!".to_string(),

            // Facility sugar. The registry answers with an error outcome
            // when the action is not offered where the party stands.
            "rest" => self.run("rest", ActionParams::new()),
            "bless" => self.run("blessing", ActionParams::new()),
            "resurrect" => self.member_action("resurrect", args),
            "cure" => self.member_action("cure", args),
            "buy" => self.purchase_action("buy", args),
            "book" => self.purchase_action("buy_book", args),
            "retrieve" => match args {
                [] => self.run("retrieve", ActionParams::new()),
                [item, rest @ ..] => {
                    let mut params = ActionParams::new().with_item(ItemId::new(*item));
                    if let [member] = rest {
                        match self.member_id(member) {
                            Ok(id) => params = params.with_character(id),
                            Err(e) => return e,
                        }
                    }
                    self.run("retrieve", params)
                }
            },
            "sell" => self.carry_action("sell", args),
            "store" => self.carry_action("store", args),
            "analyze" => match args {
                [] => self.run("analyze", ActionParams::new()),
                [item] => self.run(
                    "analyze",
                    ActionParams::new().with_item(ItemId::new(*item)),
                ),
                _ => "usage: analyze [item]".to_string(),
            },
            "learn" => match args {
                [] => self.run("learn", ActionParams::new()),
                [member] => match self.member_id(member) {
                    Ok(id) => self.run("learn", ActionParams::new().with_character(id)),
                    Err(e) => e,
                },
                [member, spell] => match self.member_id(member) {
                    Ok(id) => self.run(
                        "learn",
                        ActionParams::new()
                            .with_character(id)
                            .with_spell(SpellId::new(*spell)),
                    ),
                    Err(e) => e,
                },
                _ => "usage: learn [member] [spell]".to_string(),
            },
            "register" => self.do_register(args),
            "dismiss" => match args {
                [member] => match self.member_id(member) {
                    Ok(id) => self.run("dismiss", ActionParams::new().with_character(id)),
                    Err(e) => e,
                },
                _ => self.run("dismiss", ActionParams::new()),
            },
            "class" => match args {
                [member, class] => {
                    let Some(class) = CharacterClass::parse(class) else {
                        return format!("unknown class: {class}");
                    };
                    match self.member_id(member) {
                        Ok(id) => self.run(
                            "change_class",
                            ActionParams::new().with_character(id).with_class(class),
                        ),
                        Err(e) => e,
                    }
                }
                _ => "usage: class <member> <class>".to_string(),
            },
            "rename" => {
                if args.is_empty() {
                    "usage: rename <new party name>".to_string()
                } else {
                    self.run("rename_party", ActionParams::new().with_name(args.join(" ")))
                }
            }
            _ => format!("unknown command: {cmd} (try 'help')"),
        }
    }

    /// Execute an action, render the outcome, and park confirm quotes.
    fn run(&mut self, action: &str, params: ActionParams) -> String {
        let outcome = self.registry.execute(action, &params);
        if outcome.needs_confirmation() {
            self.pending = Some((action.to_string(), params.confirm()));
        }
        render_outcome(&outcome)
    }

    fn do_enter(&mut self, args: &[&str]) -> String {
        let Some(name) = args.first() else {
            return "usage: enter <guild|inn|shop|temple|magic_guild>".to_string();
        };
        let id: FacilityId = match name.parse() {
            Ok(id) => id,
            Err(e) => return e.to_string(),
        };
        self.pending = None;
        match self.registry.enter_facility(id, self.party.clone()) {
            Ok(()) => format!("The party stands in the {}.", self.registry.profile(id).name),
            Err(e) => e.to_string(),
        }
    }

    fn do_leave(&mut self) -> String {
        self.pending = None;
        if !self.registry.is_in_facility() {
            return "The party is already on the town square.".to_string();
        }
        match self.registry.exit_current_facility() {
            Ok(()) => "The party steps back onto the square.".to_string(),
            Err(e) => e.to_string(),
        }
    }

    fn do_menu(&self) -> String {
        let items = self.registry.menu();
        if items.is_empty() {
            return "No services here. Enter a facility first.".to_string();
        }
        let mut out = String::from("Services:\n");
        for item in items {
            let marker = if item.enabled { " " } else { "-" };
            out.push_str(&format!(
                "  {marker} {:<14} {}\n",
                item.id,
                item.description.dimmed()
            ));
        }
        out.trim_end().to_string()
    }

    fn do_status(&self) -> String {
        let party = self.party.borrow();
        let mut out = format!("{} — {} gold\n", party.name.bold(), party.gold);
        for m in &party.members {
            out.push_str(&format!(
                "  {:<8} {:<8} lvl {:<2} hp {}/{} mp {}/{} [{}]\n",
                m.name, m.class.to_string(), m.level, m.hp, m.max_hp, m.mp, m.max_mp, m.status
            ));
        }
        match self.registry.current_facility() {
            Some(id) => out.push_str(&format!("Inside: {}", self.registry.profile(id).name)),
            None => out.push_str("On the town square."),
        }
        out
    }

    fn do_confirm(&mut self) -> String {
        match self.pending.take() {
            Some((action, params)) => {
                let outcome = self.registry.execute(&action, &params);
                render_outcome(&outcome)
            }
            None => "Nothing awaits confirmation.".to_string(),
        }
    }

    fn do_cancel(&mut self) -> String {
        match self.pending.take() {
            Some(_) => "Thought better of it.".to_string(),
            None => "Nothing to cancel.".to_string(),
        }
    }

    /// `register [name]`: resolve a roster candidate by name through the
    /// guild's own selection list, exactly as a widget frontend would.
    fn do_register(&mut self, args: &[&str]) -> String {
        let listing = self.registry.execute("register", &ActionParams::new());
        let Some(name) = args.first() else {
            return render_outcome(&listing);
        };
        let Some(OutcomeData::Characters(candidates)) = &listing.data else {
            return render_outcome(&listing);
        };
        match candidates
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
        {
            Some(c) => self.run("register", ActionParams::new().with_character(c.id)),
            None => format!("no candidate named {name}"),
        }
    }

    /// Sugar for `<action> [member]` temple flows.
    fn member_action(&mut self, action: &str, args: &[&str]) -> String {
        match args {
            [] => self.run(action, ActionParams::new()),
            [member] => match self.member_id(member) {
                Ok(id) => self.run(action, ActionParams::new().with_character(id)),
                Err(e) => e,
            },
            _ => format!("usage: {action} [member]"),
        }
    }

    /// Sugar for `<action> [item] [qty] [member]` purchase flows.
    fn purchase_action(&mut self, action: &str, args: &[&str]) -> String {
        match args {
            [] => self.run(action, ActionParams::new()),
            [item, rest @ ..] => {
                let mut params = ActionParams::new().with_item(ItemId::new(*item));
                let mut rest = rest.iter();
                if let Some(qty) = rest.next() {
                    match qty.parse::<u32>() {
                        Ok(q) => params = params.with_quantity(q),
                        Err(_) => return format!("quantity must be a number, got {qty}"),
                    }
                }
                if let Some(member) = rest.next() {
                    match self.member_id(member) {
                        Ok(id) => params = params.with_character(id),
                        Err(e) => return e,
                    }
                }
                self.run(action, params)
            }
        }
    }

    /// Sugar for `<action> <member> <item>` inventory flows.
    fn carry_action(&mut self, action: &str, args: &[&str]) -> String {
        match args {
            [member, item] => match self.member_id(member) {
                Ok(id) => self.run(
                    action,
                    ActionParams::new()
                        .with_character(id)
                        .with_item(ItemId::new(*item)),
                ),
                Err(e) => e,
            },
            _ => self.run(action, ActionParams::new()),
        }
    }

    fn member_id(&self, name: &str) -> Result<CharacterId, String> {
        self.party
            .borrow()
            .member_by_name(name)
            .map(|m| m.id)
            .ok_or_else(|| format!("no party member named {name}"))
    }
}

fn help_text() -> &'static str {
    "\
Town commands:
  enter <facility>        guild, inn, shop, temple, magic_guild
  leave                   Back to the town square
  menu                    Services of the current facility
  status                  Party summary
  confirm / cancel        Settle or drop a pending quote
  quit                    Leave the town

Facility services (where offered):
  rest                    Inn: a night's rest for the party
  resurrect [member]      Temple: raise the dead
  cure [member]           Temple: clear poison or paralysis
  bless                   Temple: a blessing for the road
  buy [item] [qty] [to]   Shop: browse or buy
  sell <member> <item>    Shop: sell for half price
  store <member> <item>   Shop: vault an item
  retrieve <item> [to]    Shop: take an item back out
  learn [member] [spell]  Magic guild: spell instruction
  book [item] [qty] [to]  Magic guild: spellbooks
  analyze [item]          Magic guild: identify an item
  register [name]         Guild: recruit from the roster
  dismiss <member>        Guild: return a member to the roster
  class <member> <class>  Guild: retrain a proven member
  rename <name>           Guild: rename the party"
}

pub fn run(gold: u32) -> Result<(), String> {
    let mut repl = TownRepl::new(gold);

    println!("  {} Gildenhall", "Welcome to".bold());
    println!("  Type 'help' for commands, 'quit' to leave.\n");

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break, // EOF
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let output = repl.process(input);
        if !output.is_empty() {
            println!("{output}\n");
        }
        if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("q") {
            break;
        }
    }

    Ok(())
}
