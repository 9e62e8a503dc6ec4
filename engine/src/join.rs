//! Paid membership.

use crate::error::TemplError;
use crate::event::TemplEvent;
use crate::membership::JoinId;
use crate::templ::{Templ, Txn};
use templ_host::Host;
use templ_treasury::FeeBreakdown;
use templ_types::Address;

/// What a join cost and where the fee went.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JoinReceipt {
    pub member: Address,
    pub join_id: JoinId,
    pub fee: FeeBreakdown,
    /// The referrer actually paid, if any.
    pub referrer: Option<Address>,
}

impl Templ {
    /// Admit `recipient`, charging the current entry fee to `payer`.
    ///
    /// `payer` must have approved the templ for the fee in the access token.
    /// A referrer that is not a member, is zero, or is the recipient is ignored.
    pub fn join(
        &mut self,
        host: &mut dyn Host,
        payer: Address,
        recipient: Address,
        referrer: Option<Address>,
    ) -> Result<JoinReceipt, TemplError> {
        self.transact(host, "join", |txn| txn.join(payer, recipient, referrer))
    }
}

impl Txn<'_> {
    fn join(
        &mut self,
        payer: Address,
        recipient: Address,
        referrer: Option<Address>,
    ) -> Result<JoinReceipt, TemplError> {
        if recipient.is_zero() {
            return Err(TemplError::InvalidRecipient);
        }
        if self.state.members.contains(&recipient) {
            return Err(TemplError::AlreadyMember);
        }
        if self.state.settings.join_paused {
            return Err(TemplError::JoinIntakePaused);
        }
        if self.state.member_limit_reached() {
            return Err(TemplError::MemberLimitReached {
                max: self.state.settings.max_members,
            });
        }

        let price = self.state.current_entry_fee();
        let referrer = referrer.filter(|r| {
            !r.is_zero() && *r != recipient && self.state.members.contains(r)
        });
        let share = referrer.map(|_| self.state.settings.referral_share_bps);
        let fee = self.state.settings.split.apply(price, share)?;

        self.collect(&payer, fee.fee)?;
        let access = self.state.access_asset();
        let burn_address = self.state.settings.burn_address;
        let protocol_recipient = self.state.settings.protocol_fee_recipient;
        self.pay_out(&access, &burn_address, fee.burn)?;
        self.pay_out(&access, &protocol_recipient, fee.protocol)?;
        if let Some(referrer) = referrer {
            self.pay_out(&access, &referrer, fee.referral)?;
        }

        // the pool slice goes to the members already in; with nobody to
        // share it the treasury keeps it
        let existing = self.state.members.count();
        let pooled = fee.pooled();
        let mut to_treasury = fee.treasury;
        let mut to_member_pool = pooled;
        if existing == 0 {
            to_treasury = to_treasury.checked_add(pooled).ok_or(TemplError::Overflow)?;
            to_member_pool = 0;
        } else if pooled > 0 {
            self.state.rewards.credit(&access, pooled, existing)?;
        }
        self.state.treasury_balance = self
            .state
            .treasury_balance
            .checked_add(to_treasury)
            .ok_or(TemplError::Overflow)?;

        let stats = &mut self.state.stats;
        stats.total_burned = stats.total_burned.saturating_add(fee.burn);
        stats.total_protocol_fees = stats.total_protocol_fees.saturating_add(fee.protocol);
        stats.total_referrals = stats.total_referrals.saturating_add(fee.referral);

        let snapshots = self.state.reward_snapshots();
        let join_id = self.state.members.admit(recipient, self.now, true, snapshots);

        tracing::info!(
            member = %recipient,
            payer = %payer,
            fee = fee.fee,
            members = self.state.members.count(),
            "member joined"
        );
        self.emit(TemplEvent::MemberJoined {
            member: recipient,
            payer,
            join_id,
            fee: fee.fee,
            burned: fee.burn,
            to_treasury,
            to_member_pool,
            protocol_fee: fee.protocol,
            referrer,
            referral: fee.referral,
            at: self.now,
        });

        if self.state.member_limit_reached() && !self.state.settings.join_paused {
            self.state.settings.join_paused = true;
            tracing::info!(max = self.state.settings.max_members, "member limit reached, joins paused");
            self.emit(TemplEvent::JoinPauseUpdated { paused: true });
        }

        Ok(JoinReceipt {
            member: recipient,
            join_id,
            fee,
            referrer,
        })
    }
}
