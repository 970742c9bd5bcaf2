use shared::{
    domain::{ActionKind, RecipientId, TransferToken, WalletAddress},
    protocol::{ChildAccountForm, FormPayload, ParentAccountForm, TransferForm, TransferReceipt},
};

use crate::{
    controller::{FormActionController, GuardedAction, Resolution},
    error::{ActionError, TransportError},
    page::{Control, Page},
    transport::Endpoint,
};

impl FormActionController {
    /// Sends `form` to `/transfer-post/{token}`; navigates to `/wallet` on success.
    pub async fn transfer(
        &self,
        token: TransferToken,
        form: &TransferForm,
        trigger: &dyn Control,
        page: &dyn Page,
    ) -> Result<TransferReceipt, ActionError> {
        let action = GuardedAction::for_kind(
            ActionKind::Transfer,
            Endpoint::transfer(token),
            FormPayload::from(form),
        )
        .with_trigger(trigger);
        Ok(self.submit(action, page).await?.body().receipt())
    }

    pub async fn add_child(
        &self,
        form: &ChildAccountForm,
        trigger: &dyn Control,
        page: &dyn Page,
    ) -> Result<Resolution, ActionError> {
        let action = GuardedAction::for_kind(
            ActionKind::AddChild,
            Endpoint::add_child(),
            FormPayload::from(form),
        )
        .with_trigger(trigger);
        self.submit(action, page).await
    }

    pub async fn add_parent(
        &self,
        form: &ParentAccountForm,
        trigger: &dyn Control,
        page: &dyn Page,
    ) -> Result<Resolution, ActionError> {
        let action = GuardedAction::for_kind(
            ActionKind::AddParent,
            Endpoint::add_parent(),
            FormPayload::from(form),
        )
        .with_trigger(trigger);
        self.submit(action, page).await
    }

    /// Looks up the wallet address of a family member and writes it into `to_address`.
    pub async fn resolve_address(
        &self,
        recipient: &RecipientId,
        page: &dyn Page,
    ) -> Result<WalletAddress, ActionError> {
        let action = GuardedAction::for_kind(
            ActionKind::ResolveAddress,
            Endpoint::get_address(recipient),
            FormPayload::new(),
        );
        match self.submit(action, page).await? {
            Resolution::InputFilled { value, .. } => Ok(WalletAddress(value)),
            Resolution::Navigated { body, .. } => body.address().map_err(|source| {
                ActionError::Transport(TransportError::Malformed {
                    endpoint: Endpoint::get_address(recipient).to_string(),
                    source,
                })
            }),
        }
    }
}
