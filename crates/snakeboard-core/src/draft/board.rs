// Snake draft board: distributes ranked players into a team-by-round grid.
//
// Round 0 runs Team 1 -> Team N, round 1 runs Team N -> Team 1, and so on.
// Every team column has the same number of rounds; cells past the last
// player hold `Slot::Empty`.

use serde::{Deserialize, Serialize};

use super::player::PlayerRecord;

// ---------------------------------------------------------------------------
// Board types
// ---------------------------------------------------------------------------

/// One board cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Slot {
    Player(PlayerRecord),
    Empty,
}

impl Slot {
    pub fn player(&self) -> Option<&PlayerRecord> {
        match self {
            Slot::Player(p) => Some(p),
            Slot::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }
}

/// A team and its picks, one slot per round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamColumn {
    pub label: String,
    pub slots: Vec<Slot>,
}

/// Team label -> per-round slots, kept in team index order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftBoard {
    teams: Vec<TeamColumn>,
}

/// A filled cell visited in draft order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardPick<'a> {
    /// 1-based pick number across the whole draft.
    pub overall_pick: usize,
    pub round: usize,
    pub team_index: usize,
    pub player: &'a PlayerRecord,
}

impl DraftBoard {
    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    /// Rounds per team. Identical for every team by construction.
    pub fn round_count(&self) -> usize {
        self.teams.first().map(|t| t.slots.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// Team columns in index order.
    pub fn teams(&self) -> &[TeamColumn] {
        &self.teams
    }

    /// Look up a team's slots by label.
    pub fn get(&self, label: &str) -> Option<&[Slot]> {
        self.teams
            .iter()
            .find(|t| t.label == label)
            .map(|t| t.slots.as_slice())
    }

    pub fn cell(&self, team_index: usize, round: usize) -> Option<&Slot> {
        self.teams.get(team_index)?.slots.get(round)
    }

    /// Number of cells holding a player.
    pub fn filled_count(&self) -> usize {
        self.teams
            .iter()
            .flat_map(|t| t.slots.iter())
            .filter(|s| !s.is_empty())
            .count()
    }

    /// Overall pick number for a cell on this board.
    pub fn overall_pick(&self, round: usize, team_index: usize) -> usize {
        overall_pick(round, team_index, self.team_count())
    }

    /// Filled cells in the order they were drafted.
    pub fn picks_in_order(&self) -> Vec<BoardPick<'_>> {
        let team_count = self.team_count();
        let mut picks = Vec::with_capacity(self.filled_count());
        for round in 0..self.round_count() {
            for pick_in_round in 0..team_count {
                let team_index = team_for_pick(round, pick_in_round, team_count);
                if let Some(Slot::Player(player)) = self.cell(team_index, round) {
                    picks.push(BoardPick {
                        overall_pick: overall_pick(round, team_index, team_count),
                        round,
                        team_index,
                        player,
                    });
                }
            }
        }
        picks
    }

    /// Locate the first cell holding the given rank.
    pub fn find_rank(&self, rank: i64) -> Option<(usize, usize)> {
        self.teams.iter().enumerate().find_map(|(team_index, team)| {
            team.slots
                .iter()
                .position(|s| s.player().is_some_and(|p| p.rank == rank))
                .map(|round| (team_index, round))
        })
    }
}

// ---------------------------------------------------------------------------
// Snake ordering
// ---------------------------------------------------------------------------

/// Even rounds run in team order, odd rounds in reverse.
pub fn is_forward_round(round: usize) -> bool {
    round % 2 == 0
}

/// Team index that makes the `pick_in_round`-th selection of `round`.
pub fn team_for_pick(round: usize, pick_in_round: usize, team_count: usize) -> usize {
    if is_forward_round(round) {
        pick_in_round
    } else {
        team_count - 1 - pick_in_round
    }
}

/// 1-based overall pick number for the cell at `(round, team_index)`.
///
/// Uses the same parity rule as placement, so walking picks in ascending
/// overall order visits players in input order.
pub fn overall_pick(round: usize, team_index: usize, team_count: usize) -> usize {
    let pick_in_round = if is_forward_round(round) {
        team_index
    } else {
        team_count - 1 - team_index
    };
    round * team_count + pick_in_round + 1
}

/// Positional team label: index 0 -> "Team 1".
pub fn team_label(index: usize) -> String {
    format!("Team {}", index + 1)
}

pub fn default_team_names(team_count: usize) -> Vec<String> {
    (0..team_count).map(team_label).collect()
}

// ---------------------------------------------------------------------------
// Assignment
// ---------------------------------------------------------------------------

/// Lay players out on a snake board with positional team labels.
///
/// An empty player list or zero teams yields an empty board.
pub fn assign(players: &[PlayerRecord], team_count: usize) -> DraftBoard {
    assign_with_names(players, &default_team_names(team_count))
}

/// Lay players out on a snake board using the given team names.
///
/// The team count is `names.len()`. Names are used positionally; keeping
/// them distinct is the caller's concern.
pub fn assign_with_names<S: AsRef<str>>(players: &[PlayerRecord], names: &[S]) -> DraftBoard {
    let team_count = names.len();
    if players.is_empty() || team_count == 0 {
        return DraftBoard::default();
    }

    let round_count = players.len().div_ceil(team_count);
    let mut teams: Vec<TeamColumn> = names
        .iter()
        .map(|name| TeamColumn {
            label: name.as_ref().to_string(),
            slots: vec![Slot::Empty; round_count],
        })
        .collect();

    for (i, player) in players.iter().enumerate() {
        let round = i / team_count;
        let team_index = team_for_pick(round, i % team_count, team_count);
        teams[team_index].slots[round] = Slot::Player(player.clone());
    }

    DraftBoard { teams }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn ranked(n: i64) -> Vec<PlayerRecord> {
        (1..=n)
            .map(|r| PlayerRecord::new(r, format!("Player {r}"), "RB"))
            .collect()
    }

    fn ranks_of(slots: &[Slot]) -> Vec<Option<i64>> {
        slots.iter().map(|s| s.player().map(|p| p.rank)).collect()
    }

    #[test]
    fn three_teams_seven_players_snakes() {
        let board = assign(&ranked(7), 3);
        assert_eq!(board.team_count(), 3);
        assert_eq!(board.round_count(), 3);
        assert_eq!(ranks_of(board.get("Team 1").unwrap()), vec![Some(1), Some(6), Some(7)]);
        assert_eq!(ranks_of(board.get("Team 2").unwrap()), vec![Some(2), Some(5), None]);
        assert_eq!(ranks_of(board.get("Team 3").unwrap()), vec![Some(3), Some(4), None]);
    }

    #[test]
    fn labels_in_index_order() {
        let board = assign(&ranked(4), 4);
        let labels: Vec<&str> = board.teams().iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["Team 1", "Team 2", "Team 3", "Team 4"]);
    }

    #[test]
    fn empty_players_is_empty_board() {
        let board = assign(&[], 10);
        assert!(board.is_empty());
        assert_eq!(board.round_count(), 0);
    }

    #[test]
    fn zero_teams_is_empty_board() {
        let board = assign(&ranked(5), 0);
        assert!(board.is_empty());
        assert_eq!(board.filled_count(), 0);
    }

    #[test]
    fn every_team_has_same_round_count() {
        for team_count in 1..=12 {
            for n in 1..=40 {
                let board = assign(&ranked(n), team_count);
                let expected = (n as usize).div_ceil(team_count);
                assert!(board.teams().iter().all(|t| t.slots.len() == expected));
                assert_eq!(board.filled_count(), n as usize);
                assert_eq!(
                    board.teams().iter().map(|t| t.slots.len()).sum::<usize>() - n as usize,
                    expected * team_count - n as usize
                );
            }
        }
    }

    #[test]
    fn more_teams_than_players() {
        let board = assign(&ranked(2), 5);
        assert_eq!(board.round_count(), 1);
        assert_eq!(board.filled_count(), 2);
        assert!(board.cell(2, 0).unwrap().is_empty());
        assert!(board.cell(4, 0).unwrap().is_empty());
    }

    #[test]
    fn single_team_takes_everyone_in_order() {
        let board = assign(&ranked(4), 1);
        assert_eq!(
            ranks_of(&board.teams()[0].slots),
            vec![Some(1), Some(2), Some(3), Some(4)]
        );
    }

    #[test]
    fn overall_pick_follows_snake() {
        assert_eq!(overall_pick(0, 0, 3), 1);
        assert_eq!(overall_pick(0, 2, 3), 3);
        assert_eq!(overall_pick(1, 2, 3), 4);
        assert_eq!(overall_pick(1, 0, 3), 6);
        assert_eq!(overall_pick(2, 0, 3), 7);
    }

    #[test]
    fn overall_picks_match_placement_order() {
        for team_count in 1..=10 {
            for n in 1..=33 {
                let board = assign(&ranked(n), team_count);
                let picks = board.picks_in_order();
                let overall: Vec<usize> = picks.iter().map(|p| p.overall_pick).collect();
                let expected: Vec<usize> = (1..=n as usize).collect();
                assert_eq!(overall, expected);
                let ranks: Vec<i64> = picks.iter().map(|p| p.player.rank).collect();
                assert_eq!(ranks, (1..=n).collect::<Vec<_>>());
            }
        }
    }

    #[test]
    fn custom_names_keep_assignment() {
        let names = ["Sharks", "Jets", "Owls"];
        let board = assign_with_names(&ranked(7), &names);
        assert_eq!(ranks_of(board.get("Owls").unwrap()), vec![Some(3), Some(4), None]);
        assert_eq!(board.teams()[0].label, "Sharks");
    }

    #[test]
    fn find_rank_locates_cell() {
        let board = assign(&ranked(7), 3);
        assert_eq!(board.find_rank(4), Some((2, 1)));
        assert_eq!(board.find_rank(7), Some((0, 2)));
        assert_eq!(board.find_rank(99), None);
    }

    #[test]
    fn assignment_preserves_input_order_not_rank() {
        let players = vec![
            PlayerRecord::new(9, "A", "QB"),
            PlayerRecord::new(1, "B", "RB"),
            PlayerRecord::new(5, "C", "WR"),
        ];
        let board = assign(&players, 2);
        assert_eq!(ranks_of(board.get("Team 1").unwrap()), vec![Some(9), None]);
        assert_eq!(ranks_of(board.get("Team 2").unwrap()), vec![Some(1), Some(5)]);
    }
}
