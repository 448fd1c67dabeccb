//! Payouts that call back into the engine before `execute` returns.

use vdao_governance::{Dao, DaoEvent, ExecError, NativeLedger, Payout, PayoutError, VetoError};
use vdao_nullables::{NullAccess, NullClock, NullToken};
use vdao_oracle::Environment;
use vdao_types::{GovernanceParams, Identity, ProposalId, TokenAmount};

const WINDOW: u64 = 600;

fn who(seed: u8) -> Identity {
    Identity::new([seed; 20])
}

fn params() -> GovernanceParams {
    GovernanceParams {
        voting_window_secs: WINDOW,
        quorum: TokenAmount::new(50_000_000),
        ..Default::default()
    }
}

/// Opens, funds and passes proposals `ids`, each paying `amount` to `recipient`,
/// and moves the clock past the window.
fn passed(dao: &mut Dao<'_>, clock: &NullClock, ids: &[u64], recipient: Identity, amount: u128) {
    dao.receive(who(9), TokenAmount::new(amount * ids.len() as u128))
        .unwrap();
    for &id in ids {
        let id = ProposalId::new(id);
        dao.withdraw_eth(id, who(1), recipient, TokenAmount::new(amount))
            .unwrap();
        dao.vote(id, true, who(3)).unwrap();
    }
    clock.advance(WINDOW + 1);
}

/// A recipient whose fallback tries to execute the same proposal again.
struct ReplayingRecipient {
    target: ProposalId,
    ledger: NativeLedger,
    nested: Vec<ExecError>,
}

impl Payout for ReplayingRecipient {
    fn pay(
        &mut self,
        dao: &mut Dao<'_>,
        recipient: &Identity,
        amount: TokenAmount,
    ) -> Result<(), PayoutError> {
        let observed = dao.proposals(self.target);
        assert!(observed.is_executed(), "effects must precede the payout");
        if let Err(e) = dao.execute(self.target, &mut self.ledger) {
            self.nested.push(e);
        }
        self.ledger.pay(dao, recipient, amount)
    }
}

#[test]
fn reentrant_execute_of_same_id_is_rejected() {
    let (clock, token, access) = (NullClock::new(0), NullToken::new(), NullAccess::new());
    token.set_balance(&who(3), TokenAmount::new(60_000_000));
    let mut dao = Dao::new(params(), Environment::new(&clock, &token, &access));
    passed(&mut dao, &clock, &[666], who(2), 1_000);
    dao.receive(who(9), TokenAmount::new(5_000)).unwrap();

    let id = ProposalId::new(666);
    let mut attacker = ReplayingRecipient {
        target: id,
        ledger: NativeLedger::new(),
        nested: Vec::new(),
    };
    dao.execute(id, &mut attacker).unwrap();

    assert_eq!(attacker.nested, vec![ExecError::AlreadyExecuted(id)]);
    assert_eq!(attacker.ledger.balance_of(&who(2)), TokenAmount::new(1_000));
    assert_eq!(dao.treasury_balance(), TokenAmount::new(5_000));
}

/// A recipient that refuses every transfer.
struct RevertingRecipient;

impl Payout for RevertingRecipient {
    fn pay(
        &mut self,
        _dao: &mut Dao<'_>,
        recipient: &Identity,
        _amount: TokenAmount,
    ) -> Result<(), PayoutError> {
        Err(PayoutError::new(*recipient, "fallback reverted"))
    }
}

#[test]
fn failed_payout_rolls_back_everything() {
    let (clock, token, access) = (NullClock::new(0), NullToken::new(), NullAccess::new());
    token.set_balance(&who(3), TokenAmount::new(60_000_000));
    let mut dao = Dao::new(params(), Environment::new(&clock, &token, &access));
    passed(&mut dao, &clock, &[1], who(2), 700);
    dao.drain_events();
    let before = dao.save_state().unwrap();

    let id = ProposalId::new(1);
    let err = dao.execute(id, &mut RevertingRecipient).unwrap_err();
    assert!(matches!(err, ExecError::TransferFailed { id: failed, .. } if failed == id));

    assert_eq!(dao.save_state().unwrap(), before);
    assert!(!dao.proposals(id).is_executed());
    assert!(!dao.proposals(id).is_finalized());
    assert_eq!(dao.treasury_balance(), TokenAmount::new(700));
    assert!(dao.events().is_empty());

    let mut chain = NativeLedger::new();
    dao.execute(id, &mut chain).unwrap();
    assert_eq!(chain.balance_of(&who(2)), TokenAmount::new(700));
}

/// Executes another proposal from inside the payout, then optionally fails.
struct ChainingRecipient {
    other: ProposalId,
    fail_after: bool,
    ledger: NativeLedger,
    nested: Option<Result<(), ExecError>>,
}

impl Payout for ChainingRecipient {
    fn pay(
        &mut self,
        dao: &mut Dao<'_>,
        recipient: &Identity,
        amount: TokenAmount,
    ) -> Result<(), PayoutError> {
        self.nested = Some(dao.execute(self.other, &mut self.ledger).map(|_| ()));
        if self.fail_after {
            return Err(PayoutError::new(*recipient, "out of gas"));
        }
        self.ledger.pay(dao, recipient, amount)
    }
}

#[test]
fn nested_execute_of_other_id_is_allowed() {
    let (clock, token, access) = (NullClock::new(0), NullToken::new(), NullAccess::new());
    token.set_balance(&who(3), TokenAmount::new(60_000_000));
    let mut dao = Dao::new(params(), Environment::new(&clock, &token, &access));
    passed(&mut dao, &clock, &[1, 2], who(2), 100);

    let mut recipient = ChainingRecipient {
        other: ProposalId::new(2),
        fail_after: false,
        ledger: NativeLedger::new(),
        nested: None,
    };
    dao.execute(ProposalId::new(1), &mut recipient).unwrap();

    assert_eq!(recipient.nested, Some(Ok(())));
    assert_eq!(recipient.ledger.balance_of(&who(2)), TokenAmount::new(200));
    assert!(dao.proposals(ProposalId::new(2)).is_executed());
    assert_eq!(dao.treasury_balance(), TokenAmount::ZERO);
}

#[test]
fn outer_failure_keeps_nested_execution() {
    let (clock, token, access) = (NullClock::new(0), NullToken::new(), NullAccess::new());
    token.set_balance(&who(3), TokenAmount::new(60_000_000));
    let mut dao = Dao::new(params(), Environment::new(&clock, &token, &access));
    passed(&mut dao, &clock, &[1, 2], who(2), 100);
    let deposited = TokenAmount::new(200);

    let mut recipient = ChainingRecipient {
        other: ProposalId::new(2),
        fail_after: true,
        ledger: NativeLedger::new(),
        nested: None,
    };
    let err = dao.execute(ProposalId::new(1), &mut recipient).unwrap_err();
    assert!(matches!(err, ExecError::TransferFailed { .. }));
    assert_eq!(recipient.nested, Some(Ok(())));

    // #2 was paid inside the failed call and stays paid; only #1 is undone.
    assert_eq!(recipient.ledger.balance_of(&who(2)), TokenAmount::new(100));
    assert!(dao.proposals(ProposalId::new(2)).is_executed());
    assert!(!dao.proposals(ProposalId::new(1)).is_executed());
    assert_eq!(dao.treasury_balance(), TokenAmount::new(100));
    assert_eq!(
        dao.treasury_balance()
            .checked_add(recipient.ledger.total())
            .unwrap(),
        deposited
    );
    let executed: Vec<_> = dao
        .events()
        .iter()
        .filter_map(|e| match e {
            DaoEvent::Executed { id, .. } => Some(*id),
            _ => None,
        })
        .collect();
    assert_eq!(executed, vec![ProposalId::new(2)]);

    let mut chain = recipient.ledger;
    assert_eq!(
        dao.execute(ProposalId::new(2), &mut chain).unwrap_err(),
        ExecError::AlreadyExecuted(ProposalId::new(2))
    );
    dao.execute(ProposalId::new(1), &mut chain).unwrap();
    assert_eq!(chain.balance_of(&who(2)), TokenAmount::new(200));
    assert_eq!(dao.treasury_balance(), TokenAmount::ZERO);
    assert_eq!(chain.total(), deposited);
}

/// Tries to veto the proposal that is paying it.
struct VetoingRecipient {
    vetoer: Identity,
    target: ProposalId,
    result: Option<Result<(), VetoError>>,
}

impl Payout for VetoingRecipient {
    fn pay(
        &mut self,
        dao: &mut Dao<'_>,
        _recipient: &Identity,
        _amount: TokenAmount,
    ) -> Result<(), PayoutError> {
        self.result = Some(dao.veto(self.target, self.vetoer));
        Ok(())
    }
}

#[test]
fn veto_during_payout_sees_executed() {
    let (clock, token, access) = (NullClock::new(0), NullToken::new(), NullAccess::new());
    token.set_balance(&who(3), TokenAmount::new(60_000_000));
    access.grant_veto(&who(4));
    let mut dao = Dao::new(params(), Environment::new(&clock, &token, &access));
    passed(&mut dao, &clock, &[5], who(2), 10);

    let id = ProposalId::new(5);
    let mut recipient = VetoingRecipient {
        vetoer: who(4),
        target: id,
        result: None,
    };
    dao.execute(id, &mut recipient).unwrap();
    assert_eq!(recipient.result, Some(Err(VetoError::AlreadyExecuted(id))));
    assert!(!dao.proposals(id).is_vetoed());
}
