mod store;

use anyhow::{bail, Context, Result};
use rand::Rng;
use serde_json::map::Entry;
use serde_json::Value;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use store::FileStore;
use supersolitaire_core::{
    daily_best, daily_seed, legal_moves, BlindKind, Card, Content, Difficulty, Event, EventBus,
    GameConfig, Move, MoveKind, MoveOutcome, OfferItem, PileKind, RoundPhase, RoundState,
    RunError, ScoreCategory, Session, WASTE,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "SUPERSOLITAIRE_LOG";
const DEFAULT_SAVE_DIR: &str = ".supersolitaire";
const AUTO_STEPS_PER_BOARD: usize = 600;

#[derive(Debug, Clone, Default)]
struct CliOptions {
    auto: bool,
    daily: bool,
    seed: Option<String>,
    difficulty: Difficulty,
    config: Option<PathBuf>,
    save_dir: Option<PathBuf>,
    max_antes: Option<u32>,
}

fn parse_cli_options(args: &[String]) -> Result<CliOptions> {
    let mut options = CliOptions::default();
    let mut idx = 0usize;
    while idx < args.len() {
        let value = args.get(idx + 1);
        match args[idx].as_str() {
            "--auto" => options.auto = true,
            "--daily" => options.daily = true,
            "--seed" => {
                options.seed = Some(value.context("--seed needs a value")?.clone());
                idx += 1;
            }
            "--difficulty" => {
                let raw = value.context("--difficulty needs a value")?;
                options.difficulty = parse_difficulty(raw)?;
                idx += 1;
            }
            "--config" => {
                options.config = Some(PathBuf::from(value.context("--config needs a path")?));
                idx += 1;
            }
            "--save-dir" => {
                let raw = value.context("--save-dir needs a path")?;
                options.save_dir = Some(PathBuf::from(raw));
                idx += 1;
            }
            "--antes" => {
                let raw = value.context("--antes needs a number")?;
                let antes = raw.parse().with_context(|| format!("bad --antes {raw}"))?;
                options.max_antes = Some(antes);
                idx += 1;
            }
            other => bail!("unknown option {other}"),
        }
        idx += 1;
    }
    Ok(options)
}

fn parse_difficulty(raw: &str) -> Result<Difficulty> {
    match raw.to_ascii_lowercase().as_str() {
        "easy" => Ok(Difficulty::Easy),
        "medium" | "normal" => Ok(Difficulty::Medium),
        "hard" => Ok(Difficulty::Hard),
        _ => bail!("unknown difficulty {raw} (easy, medium, hard)"),
    }
}

fn init_logging() {
    let filter = std::env::var(LOG_ENV)
        .map(EnvFilter::new)
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .try_init()
        .ok();
}

/// Applies a partial JSON object over the default config, key by key.
fn merge_json(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                match base.entry(key) {
                    Entry::Occupied(mut slot) => merge_json(slot.get_mut(), value),
                    Entry::Vacant(slot) => {
                        slot.insert(value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let patch: Value =
        serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    let mut merged =
        serde_json::to_value(GameConfig::default()).context("serialize default config")?;
    merge_json(&mut merged, patch);
    let config: GameConfig =
        serde_json::from_value(merged).with_context(|| format!("apply {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("validate {}", path.display()))?;
    info!(path = %path.display(), "config override loaded");
    Ok(config)
}

fn random_seed() -> String {
    let value: u32 = rand::thread_rng().gen();
    format!("run-{value:08x}")
}

fn today_seed() -> String {
    daily_seed(time::OffsetDateTime::now_utc().date())
}

fn build_session(options: &CliOptions) -> Result<Session> {
    let config = load_config(options.config.as_deref())?;
    let dir = options
        .save_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SAVE_DIR));
    let store =
        FileStore::open(&dir).with_context(|| format!("open save dir {}", dir.display()))?;
    debug!(dir = %store.dir().display(), "save store ready");
    Ok(Session::new(Content::builtin(), config, Box::new(store)))
}

fn main() -> Result<()> {
    init_logging();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_cli_options(&args)?;
    let mut session = build_session(&options)?;
    if options.auto {
        return run_auto(&mut session, &options);
    }
    run_repl(&mut session, &options)
}

fn run_auto(session: &mut Session, options: &CliOptions) -> Result<()> {
    let mut events = EventBus::default();
    let seed = if options.daily {
        today_seed()
    } else {
        options.seed.clone().unwrap_or_else(random_seed)
    };
    session.start_run(&seed, options.difficulty, &mut events)?;
    drain_events(&mut events);
    let max_antes = options.max_antes.unwrap_or(1);

    while !session.game_over && session.run()?.ante <= max_antes {
        session.start_next_board(&mut events)?;
        drain_events(&mut events);
        for _ in 0..AUTO_STEPS_PER_BOARD {
            let Some(state) = session.live_round() else {
                break;
            };
            let Some(mv) = pick_auto_move(state) else {
                break;
            };
            match session.submit_move(mv, &mut events)? {
                MoveOutcome::Applied { .. } => {}
                _ => break,
            }
        }
        if session.live_round().is_some() {
            session.complete_round(false, &mut events)?;
        }
        drain_events(&mut events);
    }
    print_status(session);
    Ok(())
}

/// Greedy play: foundations first, then waste plays, then column moves that
/// uncover something, then the stock.
fn pick_auto_move(state: &RoundState) -> Option<Move> {
    let moves: Vec<Move> = legal_moves(state)
        .into_iter()
        .filter(|mv| mv.kind != MoveKind::Undo)
        .collect();
    let uncovers = |mv: &Move| {
        mv.kind == MoveKind::TableauToTableau
            && mv
                .from
                .as_deref()
                .and_then(|id| state.pile(id))
                .is_some_and(|pile| {
                    let below = pile.len().checked_sub(mv.run_len() + 1);
                    below.is_some_and(|idx| !pile.cards[idx].face_up)
                })
    };
    let redeal_allowed = state.stock_len() > 0 || state.redeals_left > 0;
    moves
        .iter()
        .find(|mv| mv.kind.is_foundation())
        .or_else(|| moves.iter().find(|mv| mv.kind == MoveKind::WasteToTableau))
        .or_else(|| moves.iter().find(|mv| uncovers(mv)))
        .or_else(|| {
            moves
                .iter()
                .find(|mv| mv.kind == MoveKind::DealStock && redeal_allowed)
        })
        .cloned()
}

fn run_repl(session: &mut Session, options: &CliOptions) -> Result<()> {
    let mut events = EventBus::default();
    println!("supersolitaire. type `help` for commands.");
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{}", prompt_text(session));
        io::stdout().flush().context("flush stdout")?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("read command")?;
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, args)) = parts.split_first() else {
            continue;
        };
        match execute_command(session, options, command, args, &mut events) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(err) => println!("error: {err:#}"),
        }
        drain_events(&mut events);
    }
    Ok(())
}

enum Flow {
    Continue,
    Quit,
}

fn execute_command(
    session: &mut Session,
    options: &CliOptions,
    command: &str,
    args: &[&str],
    events: &mut EventBus,
) -> Result<Flow> {
    match command {
        "help" | "h" | "?" => print_help(),
        "quit" | "exit" | "q" => return Ok(Flow::Quit),
        "new" => {
            let seed = args
                .first()
                .map(|seed| seed.to_string())
                .or_else(|| options.seed.clone())
                .unwrap_or_else(random_seed);
            let difficulty = match args.get(1) {
                Some(raw) => parse_difficulty(raw)?,
                None => options.difficulty,
            };
            session.start_run(&seed, difficulty, events)?;
        }
        "daily" => {
            let seed = today_seed();
            if let Some(best) = daily_best(session.store(), &seed) {
                println!("best today: {best}");
            }
            session.start_run(&seed, options.difficulty, events)?;
        }
        "continue" | "load" => session.continue_saved_run(events)?,
        "next" | "n" => {
            session.start_next_board(events)?;
            print_board(session);
        }
        "skip" => {
            match args.first().copied() {
                Some("big") => session.skip_to_big(events)?,
                Some("boss") => session.skip_to_boss(events)?,
                _ => bail!("usage: skip big|boss"),
            }
            print_board(session);
        }
        "board" | "b" => print_board(session),
        "move" | "m" => {
            let mv = parse_move(args)?;
            report_move(session.submit_move(mv, events)?);
            print_board(session);
        }
        "deal" | "d" => {
            report_move(session.deal_stock(events)?);
            print_board(session);
        }
        "undo" | "u" => {
            report_move(session.undo(events)?);
            print_board(session);
        }
        "hint" => match session.hint(events)? {
            Some(mv) => println!("hint: {mv}"),
            None => println!("hint: no foundation move"),
        },
        "redeal" => {
            session.full_redeal(events)?;
            print_board(session);
        }
        "tick" | "t" => {
            let count = parse_count(args.first().copied(), 1)?;
            for _ in 0..count {
                session.tick(events)?;
                if session.live_round().is_none() {
                    break;
                }
            }
        }
        "pause" => session.set_paused(true, events),
        "resume" => session.set_paused(false, events),
        "end" => {
            let outcome = session.complete_round(false, events)?;
            println!(
                "round {}: {} / {}",
                if outcome.success { "won" } else { "lost" },
                outcome.score,
                outcome.target
            );
        }
        "shop" | "s" => print_shop(session),
        "buy" => {
            session.buy_offer(required(args, 0, "buy OFFER_ID")?, events)?;
            print_shop(session);
        }
        "reroll" | "r" => {
            session.reroll_shop(events)?;
            print_shop(session);
        }
        "lock" => {
            session.toggle_lock_offer(required(args, 0, "lock OFFER_ID")?, events)?;
        }
        "sell" => {
            session.sell_joker(required(args, 0, "sell JOKER_ID")?, events)?;
        }
        "use" => session.use_god_card(required(args, 0, "use GOD_ID")?, events)?,
        "rank" => {
            let raw = required(args, 0, "rank CATEGORY")?;
            let category = ScoreCategory::from_id(raw).with_context(|| {
                let known: Vec<&str> = ScoreCategory::ALL.iter().map(|c| c.id()).collect();
                format!("unknown category {raw} ({})", known.join(", "))
            })?;
            session.rank_up(category, events)?;
        }
        "jokers" | "inv" => print_inventory(session),
        "unequip" => session.unequip_joker(required(args, 0, "unequip JOKER_ID")?, events)?,
        "order" => {
            let id = required(args, 0, "order JOKER_ID INDEX")?;
            let index = parse_count(args.get(1).copied(), 0)?;
            session.reorder_joker(id, index, events)?;
        }
        "status" | "state" => print_status(session),
        _ => println!("unknown command `{command}`; type `help`"),
    }
    Ok(Flow::Continue)
}

fn required<'a>(args: &[&'a str], idx: usize, usage: &str) -> Result<&'a str> {
    args.get(idx)
        .copied()
        .with_context(|| format!("usage: {usage}"))
}

fn parse_count(raw: Option<&str>, default: usize) -> Result<usize> {
    match raw {
        Some(raw) => raw.parse().with_context(|| format!("not a number: {raw}")),
        None => Ok(default),
    }
}

/// `FROM TO [COUNT]`, with `w` standing for the waste.
fn parse_move(args: &[&str]) -> Result<Move> {
    let (Some(from), Some(to)) = (args.first().copied(), args.get(1).copied()) else {
        bail!("usage: move FROM TO [COUNT]   e.g. move t3 f0, move w t2, move t0 t4 3");
    };
    let from = if from == "w" { WASTE } else { from };
    let to_foundation = to.starts_with('f');
    let mv = match (from == WASTE, to_foundation) {
        (true, true) => Move::waste_to_foundation(to),
        (true, false) => Move::waste_to_tableau(to),
        (false, true) => Move::tableau_to_foundation(from, to),
        (false, false) => {
            Move::tableau_to_tableau(from, to, parse_count(args.get(2).copied(), 1)?)
        }
    };
    Ok(mv)
}

fn report_move(outcome: MoveOutcome) {
    match outcome {
        MoveOutcome::Applied { delta } => println!("ok (+{delta})"),
        MoveOutcome::Illegal(reason) => println!("illegal: {reason}"),
        MoveOutcome::Vetoed(veto) => println!("blocked: {veto}"),
        MoveOutcome::Forgiven(reason) => println!("forgiven: {reason}"),
    }
}

fn prompt_text(session: &Session) -> String {
    let Ok(run) = session.run() else {
        return "> ".to_string();
    };
    match session.live_round() {
        Some(state) => format!(
            "[a{} {} {}/{} {}s] > ",
            run.ante,
            session.current_blind(),
            state.score,
            state.config.target_score,
            state.time_remaining_sec
        ),
        None => format!("[a{} ${}] > ", run.ante, run.coins),
    }
}

fn print_help() {
    println!("run:     new [SEED] [DIFFICULTY] | daily | continue | status | quit");
    println!("boards:  next | skip big|boss | end");
    println!("play:    board | move FROM TO [COUNT] | deal | undo | hint | redeal");
    println!("clock:   tick [N] | pause | resume");
    println!("shop:    shop | buy ID | reroll | lock ID | sell JOKER");
    println!("items:   jokers | use GOD | rank CATEGORY | unequip JOKER | order JOKER INDEX");
    println!("piles:   t0..t6 tableau, f0..f3 foundations, w waste");
}

fn card_text(card: &Card) -> String {
    if card.face_up {
        card.label()
    } else {
        "##".to_string()
    }
}

fn print_board(session: &Session) {
    let Some(round) = session.round.as_ref() else {
        println!("no board dealt");
        return;
    };
    let state = &round.state;
    let bosses: Vec<&str> = round.bosses.iter().map(|boss| boss.name.as_str()).collect();
    println!(
        "{} blind  score {} / {}  time {}s  redeals {}  streak {} (x{:.2}){}",
        round.blind,
        state.score,
        state.config.target_score,
        state.time_remaining_sec,
        state.redeals_left,
        state.streak,
        state.streak_multiplier,
        if bosses.is_empty() {
            String::new()
        } else {
            format!("  boss: {}", bosses.join(", "))
        }
    );
    let foundations: Vec<String> = state
        .piles_of(PileKind::Foundation)
        .map(|pile| {
            let top = pile.top().map_or_else(|| "--".to_string(), card_text);
            format!("{}:{top}", pile.id)
        })
        .collect();
    let waste = state
        .pile(WASTE)
        .and_then(|pile| pile.top())
        .map_or_else(|| "--".to_string(), card_text);
    println!(
        "stock {}  waste {} ({})  {}",
        state.stock_len(),
        waste,
        state.waste_len(),
        foundations.join(" ")
    );
    for pile in state.piles_of(PileKind::Tableau) {
        let cards: Vec<String> = pile.cards.iter().map(card_text).collect();
        println!("  {}: {}", pile.id, cards.join(" "));
    }
    if !matches!(round.phase, RoundPhase::Dealt | RoundPhase::InProgress) {
        println!("round closed: {:?}", round.phase);
    }
}

fn print_shop(session: &Session) {
    let Some(shop) = session.shop.as_ref() else {
        println!("shop not available");
        return;
    };
    let coins = session.run.as_ref().map_or(0, |run| run.coins);
    println!(
        "shop round {}  coins {}  reroll {}",
        shop.round,
        coins,
        shop.reroll_cost(&session.config)
    );
    for offer in &shop.offers {
        let kind = match &offer.item {
            OfferItem::Joker { variant, .. } => match variant {
                Some(variant) => format!("joker/{variant:?}"),
                None => "joker".to_string(),
            },
            OfferItem::Boost { .. } => "boost".to_string(),
            OfferItem::God { .. } => "god".to_string(),
            OfferItem::Pack { size, .. } => format!("pack/{size}"),
            OfferItem::Special { .. } => "special".to_string(),
        };
        println!(
            "  {:<6} {:<12} {:<24} ${:>3}{}  {}",
            offer.id,
            kind,
            offer.name,
            offer.price,
            if offer.locked { " [locked]" } else { "" },
            offer.description
        );
    }
}

fn print_inventory(session: &Session) {
    let Some(run) = session.run.as_ref() else {
        println!("no run");
        return;
    };
    println!(
        "jokers ({}/{}):",
        run.jokers.len(),
        session.config.economy.joker_slots
    );
    for (idx, joker) in run.jokers.iter().enumerate() {
        let name = session
            .content
            .joker_by_id(&joker.id)
            .map_or(joker.id.as_str(), |def| def.name.as_str());
        let variant = joker
            .variant
            .map(|variant| format!(" ({variant:?})"))
            .unwrap_or_default();
        println!("  {idx}: {:<16} {name}{variant}", joker.id);
    }
    println!("gods:");
    for god in &run.god_cards {
        println!("  {:<8} {} - {}", god.id, god.name, god.description);
    }
    println!("ranks:");
    for category in ScoreCategory::ALL {
        let patron = run
            .score_rank_patrons
            .get(&category)
            .map(|patron| format!("  {}, {}", patron.name, patron.title))
            .unwrap_or_default();
        println!(
            "  {:<18} x{:.1}{patron}",
            category.id(),
            run.score_ranks.get(category)
        );
    }
}

fn print_status(session: &Session) {
    let run = match session.run() {
        Ok(run) => run,
        Err(RunError::NoRun) => {
            println!("no run; `new`, `daily` or `continue`");
            return;
        }
        Err(err) => {
            println!("error: {err}");
            return;
        }
    };
    println!(
        "seed {}  mode {:?}  difficulty {:?}  ante {}  next {}  coins {}",
        run.seed,
        run.mode,
        run.difficulty,
        run.ante,
        BlindKind::from_index(session.blind_index),
        run.coins
    );
    let scores: Vec<String> = run
        .history
        .iter()
        .map(|entry| format!("a{}:{}", entry.ante, entry.score))
        .collect();
    if !scores.is_empty() {
        println!("history {}", scores.join(" "));
    }
    if session.game_over {
        println!("run over");
    }
}

fn drain_events(events: &mut EventBus) {
    for event in events.drain() {
        println!("event: {}", format_event(&event));
    }
}

fn format_event(event: &Event) -> String {
    match event {
        Event::RunStarted {
            seed,
            mode,
            difficulty,
        } => format!("run started {seed} ({mode:?}, {difficulty:?})"),
        Event::RunResumed { seed, ante, blind } => {
            format!("resumed {seed} at ante {ante}, {blind} blind")
        }
        Event::RoundStarted {
            ante,
            blind,
            target,
            time_sec,
            redeals,
            boss,
        } => format!(
            "ante {ante} {blind} blind: target {target}, {time_sec}s, {redeals} redeals{}",
            boss.as_deref()
                .map(|boss| format!(", boss {boss}"))
                .unwrap_or_default()
        ),
        Event::MoveApplied { mv, delta, score } => format!("{mv} +{delta} = {score}"),
        Event::MoveRejected { mv, reason } => format!("{mv} rejected: {reason}"),
        Event::MoveVetoed { mv, reason } => format!("{mv} blocked: {reason}"),
        Event::MoveForgiven { mv, reason } => format!("{mv} forgiven: {reason}"),
        Event::HintFound { mv } => match mv {
            Some(mv) => format!("hint {mv}"),
            None => "no hint".to_string(),
        },
        Event::Redealt { redeals_left } => format!("redealt, {redeals_left} left"),
        Event::TimedOut => "time is up".to_string(),
        Event::Paused { paused } => {
            if *paused {
                "paused".to_string()
            } else {
                "resumed".to_string()
            }
        }
        Event::RoundCompleted {
            outcome,
            skip_bonus,
            coins,
        } => format!(
            "{} blind {}: {} / {}, +{} coins (skip bonus {skip_bonus}), {coins} total",
            outcome.blind,
            if outcome.success { "cleared" } else { "failed" },
            outcome.score,
            outcome.target,
            outcome.coins_earned
        ),
        Event::AnteAdvanced { ante } => format!("ante {ante}"),
        Event::RunEnded { ante, score } => format!("run over at ante {ante} with {score}"),
        Event::ShopOpened {
            offers,
            reroll_cost,
        } => format!("shop open: {offers} offers, reroll {reroll_cost}"),
        Event::ShopRerolled {
            offers,
            cost,
            coins,
        } => format!("rerolled {offers} offers for {cost}, {coins} left"),
        Event::OfferBought {
            offer_id,
            cost,
            coins,
        } => format!("bought {offer_id} for {cost}, {coins} left"),
        Event::OfferLockToggled { offer_id, locked } => {
            format!("{offer_id} {}", if *locked { "locked" } else { "unlocked" })
        }
        Event::EffectQueued { effect } => format!("{effect:?} queued for next round"),
        Event::EffectApplied { effect } => format!("{effect:?} applied"),
        Event::JokerEquipped { id } => format!("equipped {id}"),
        Event::JokerSold { id, refund, coins } => format!("sold {id} for {refund}, {coins} left"),
        Event::JokerUnequipped { id } => format!("unequipped {id}"),
        Event::JokerReordered { id, index } => format!("{id} moved to {index}"),
        Event::GodCardGained { id } => format!("gained god card {id}"),
        Event::GodCardUsed { id, effect } => format!("used {id} ({effect:?})"),
        Event::RankedUp {
            category,
            rank,
            coins,
        } => format!("{category} rank x{rank:.1}, {coins} left"),
        Event::Info { message } => message.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn options_parse_flags() {
        let options = parse_cli_options(&args(&[
            "--seed",
            "abc",
            "--difficulty",
            "hard",
            "--auto",
            "--antes",
            "2",
        ]))
        .unwrap();
        assert!(options.auto);
        assert_eq!(options.seed.as_deref(), Some("abc"));
        assert_eq!(options.difficulty, Difficulty::Hard);
        assert_eq!(options.max_antes, Some(2));
        assert!(parse_cli_options(&args(&["--bogus"])).is_err());
        assert!(parse_cli_options(&args(&["--seed"])).is_err());
    }

    #[test]
    fn move_parsing_picks_the_kind() {
        assert_eq!(parse_move(&["w", "f0"]).unwrap(), Move::waste_to_foundation("f0"));
        assert_eq!(parse_move(&["w", "t3"]).unwrap(), Move::waste_to_tableau("t3"));
        assert_eq!(
            parse_move(&["t1", "f2"]).unwrap(),
            Move::tableau_to_foundation("t1", "f2")
        );
        assert_eq!(
            parse_move(&["t0", "t4", "3"]).unwrap(),
            Move::tableau_to_tableau("t0", "t4", 3)
        );
        assert!(parse_move(&["t0"]).is_err());
    }

    #[test]
    fn config_patch_merges_over_defaults() {
        let mut base = serde_json::to_value(GameConfig::default()).unwrap();
        merge_json(
            &mut base,
            json!({ "base_redeals": 4, "economy": { "reroll_cost": 1 } }),
        );
        let config: GameConfig = serde_json::from_value(base).unwrap();
        let defaults = GameConfig::default();
        assert_eq!(config.base_redeals, 4);
        assert_eq!(config.economy.reroll_cost, 1);
        assert_eq!(config.economy.joker_slots, defaults.economy.joker_slots);
        assert_eq!(config.deal_size, defaults.deal_size);
    }

    #[test]
    fn auto_play_finishes_a_board() {
        let mut session = Session::in_memory();
        let mut events = EventBus::default();
        session
            .start_run("auto-seed", Difficulty::Medium, &mut events)
            .unwrap();
        session.start_next_board(&mut events).unwrap();
        for _ in 0..AUTO_STEPS_PER_BOARD {
            let Some(mv) = session.live_round().and_then(pick_auto_move) else {
                break;
            };
            session.submit_move(mv, &mut events).unwrap();
        }
        if session.live_round().is_some() {
            session.complete_round(false, &mut events).unwrap();
        }
        assert_eq!(session.run().unwrap().history.len(), 1);
        assert!(events.drain().all(|event| !format_event(&event).is_empty()));
    }
}
