use crate::application::dto::AccountDto;
use crate::domain::entities::{Account, AccountLoginState, RecordMeta};

pub fn map_account_dto(dto: AccountDto) -> Account {
    let meta = RecordMeta::new(dto.id, dto.created_at, dto.updated_at);
    let login = AccountLoginState {
        is_logged_in: dto.state.is_logged_in,
        pending: dto.state.pending,
        username: dto.state.username,
    };

    Account::new(meta, dto.name, dto.website, dto.groups, login)
}
