use super::*;
use crate::game::*;
use crate::oracle::*;
use crate::search::*;
use crate::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;

/// Play one complete game with search on both sides.
///
/// Returns one trajectory per seat, P1 first. A state where the player to
/// move has no legal action, or reaching `max_moves`, ends the game with
/// whatever outcome the state reports. `seed` fixes the deal, the search
/// and the exploration sampling.
pub fn play_game<G, O>(
    oracle: &O,
    config: &SelfPlayConfig<G::D>,
    seed: u64,
) -> Result<Vec<Trajectory>>
where
    G: Game,
    O: Oracle,
{
    let ref mut rng = SmallRng::seed_from_u64(seed);
    let ref search = config
        .search
        .clone()
        .with_seed(config.search.seed.wrapping_add(seed));
    let mut state = G::initialize(&config.decks.0, &config.decks.1, rng)?;
    let mut steps = [Vec::new(), Vec::new()];
    let mut moves = 0;
    while !state.is_terminal() && moves < config.max_moves {
        let mask = state.mask();
        if mask.is_empty() {
            log::debug!("no legal action after {} moves, scoring as terminal", moves);
            break;
        }
        let seat = state.seat();
        let encoding = state.encode();
        let decision = select_action::<G, O>(oracle, search, &state.info(), config.budget)?;
        let action = match moves < config.exploration_moves {
            true => decision.sample(config.temperature, rng),
            false => decision.action,
        };
        let index = action.index();
        let (prior, value) = match decision.simulations {
            0 => {
                let evaluation = oracle.evaluate(&encoding, &mask)?;
                (evaluation.prior(index).unwrap_or(0.), evaluation.value)
            }
            _ => (decision.prior[index], decision.value),
        };
        steps[seat.index()].push(Step {
            seat,
            encoding,
            legal: mask,
            action: index,
            prior,
            target: decision.policy,
            value,
            reward: 0.,
        });
        state = state.apply(action);
        moves += 1;
    }
    if moves == config.max_moves {
        log::debug!("game hit the {} move cap", config.max_moves);
    }
    let [p1, p2] = steps;
    Ok(vec![
        Trajectory::new(Seat::P1, p1, state.outcome(Seat::P1)),
        Trajectory::new(Seat::P2, p2, state.outcome(Seat::P2)),
    ])
}
