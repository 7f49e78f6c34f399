use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use cardvault_core::error::AppError;
use cardvault_core::result::AppResult;
use cardvault_core::types::{CardId, GiftCardId, ResourceRef, VoucherId};
use cardvault_entity::resource::{
    Card, GiftCard, NewCard, NewGiftCard, NewVoucher, ResourceHeader, Voucher,
};

use super::MemoryStore;
use crate::repositories::ResourceRepository;

#[async_trait]
impl ResourceRepository for MemoryStore {
    async fn find_header(&self, resource: ResourceRef) -> AppResult<Option<ResourceHeader>> {
        let owner_id = match resource {
            ResourceRef::Card(id) => self.state.cards.get(&id).map(|c| c.owner_id),
            ResourceRef::Voucher(id) => self.state.vouchers.get(&id).map(|v| v.owner_id),
            ResourceRef::GiftCard(id) => self.state.gift_cards.get(&id).map(|g| g.owner_id),
        };
        Ok(owner_id.map(|owner_id| ResourceHeader { resource, owner_id }))
    }

    async fn find_card(&self, id: CardId) -> AppResult<Option<Card>> {
        Ok(self.state.cards.get(&id).map(|c| c.clone()))
    }

    async fn find_voucher(&self, id: VoucherId) -> AppResult<Option<Voucher>> {
        Ok(self.state.vouchers.get(&id).map(|v| v.clone()))
    }

    async fn find_gift_card(&self, id: GiftCardId) -> AppResult<Option<GiftCard>> {
        Ok(self.state.gift_cards.get(&id).map(|g| g.clone()))
    }

    async fn create_card(&self, data: &NewCard) -> AppResult<Card> {
        let card = Card {
            id: CardId::new(),
            owner_id: data.owner_id,
            name: data.name.clone(),
            card_number: data.card_number.clone(),
            created_at: Utc::now(),
        };
        self.state.cards.insert(card.id, card.clone());
        Ok(card)
    }

    async fn create_voucher(&self, data: &NewVoucher) -> AppResult<Voucher> {
        let voucher = Voucher {
            id: VoucherId::new(),
            owner_id: data.owner_id,
            name: data.name.clone(),
            code: data.code.clone(),
            expires_on: data.expires_on,
            created_at: Utc::now(),
        };
        self.state.vouchers.insert(voucher.id, voucher.clone());
        Ok(voucher)
    }

    async fn create_gift_card(&self, data: &NewGiftCard) -> AppResult<GiftCard> {
        if data.initial_balance < Decimal::ZERO {
            return Err(AppError::validation("Initial balance must not be negative"));
        }
        let gift_card = GiftCard {
            id: GiftCardId::new(),
            owner_id: data.owner_id,
            name: data.name.clone(),
            code: data.code.clone(),
            initial_balance: data.initial_balance,
            created_at: Utc::now(),
        };
        self.state.gift_cards.insert(gift_card.id, gift_card.clone());
        Ok(gift_card)
    }

    async fn delete(&self, resource: ResourceRef) -> AppResult<bool> {
        let existed = match resource {
            ResourceRef::Card(id) => self.state.cards.remove(&id).is_some(),
            ResourceRef::Voucher(id) => self.state.vouchers.remove(&id).is_some(),
            ResourceRef::GiftCard(id) => self.state.gift_cards.remove(&id).is_some(),
        };
        if existed {
            self.cascade_delete(resource);
        }
        Ok(existed)
    }
}
