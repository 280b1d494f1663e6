pub(crate) mod entity;

pub(crate) use entity::{
    ActiveModel as TagActiveModel, Column as TagColumn, Entity as TagEntity, Model as TagModel,
};
